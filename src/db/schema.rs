use rusqlite::Connection;

use crate::error::AbookResult;

/// Initialize the database schema. Creates all tables if they don't exist.
///
/// `contact1_id`/`contact2_id` are the primary/secondary designations and
/// deliberately carry no foreign key: contacts reference addresses and
/// addresses designate contacts, and the circular constraint would force an
/// insert order the ops layer doesn't have.
pub fn initialize(conn: &Connection) -> AbookResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS addresses (
            id TEXT PRIMARY KEY NOT NULL,
            address1 TEXT NOT NULL DEFAULT '',
            address2 TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            zip TEXT NOT NULL DEFAULT '',
            home_phone TEXT NOT NULL DEFAULT '',
            address_type TEXT,
            contact1_id TEXT,
            contact2_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY NOT NULL,
            prefix TEXT,
            first_name TEXT NOT NULL DEFAULT '',
            middle_name TEXT,
            last_name TEXT NOT NULL DEFAULT '',
            birthday TEXT,
            work_phone TEXT,
            cell_phone TEXT,
            email TEXT,
            website TEXT,
            address_id TEXT REFERENCES addresses(id),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS groups (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            UNIQUE(name COLLATE NOCASE)
        );

        CREATE TABLE IF NOT EXISTS group_addresses (
            group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
            address_id TEXT NOT NULL REFERENCES addresses(id),
            PRIMARY KEY (group_id, address_id)
        );

        CREATE TABLE IF NOT EXISTS staged_edits (
            session_key TEXT PRIMARY KEY NOT NULL,
            contact_id TEXT NOT NULL,
            payload TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
