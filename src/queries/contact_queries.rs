use rusqlite::Connection;

use crate::db::contact_repo;
use crate::error::AbookResult;
use crate::model::Contact;

/// All contacts ordered by (last name, first name).
pub fn find_for_list(conn: &Connection) -> AbookResult<Vec<Contact>> {
    contact_repo::find_all(conn)
}

/// Case-insensitive last-name prefix search, same order as the full list.
pub fn find_by_last_name_prefix(conn: &Connection, prefix: &str) -> AbookResult<Vec<Contact>> {
    contact_repo::find_by_last_name_prefix(conn, prefix)
}
