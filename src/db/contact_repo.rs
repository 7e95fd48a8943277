use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::{parse_id, parse_optional_id};
use crate::error::{AbookError, AbookResult};
use crate::model::{Address, Contact, Id};

const COLUMNS: &str = "id, prefix, first_name, middle_name, last_name, birthday, work_phone, cell_phone, email, website, address_id";

type ContactRow = (
    String,
    Option<String>,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

pub fn insert(conn: &Connection, contact: &Contact) -> AbookResult<()> {
    conn.execute(
        "INSERT INTO contacts (id, prefix, first_name, middle_name, last_name, birthday, work_phone, cell_phone, email, website, address_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            contact.id.to_string(),
            contact.prefix,
            contact.first_name,
            contact.middle_name,
            contact.last_name,
            contact.birthday.map(|d| d.to_string()),
            contact.work_phone,
            contact.cell_phone,
            contact.email,
            contact.website,
            contact.address_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, contact: &Contact) -> AbookResult<()> {
    conn.execute(
        "UPDATE contacts SET prefix = ?1, first_name = ?2, middle_name = ?3, last_name = ?4,
         birthday = ?5, work_phone = ?6, cell_phone = ?7, email = ?8, website = ?9, address_id = ?10
         WHERE id = ?11",
        params![
            contact.prefix,
            contact.first_name,
            contact.middle_name,
            contact.last_name,
            contact.birthday.map(|d| d.to_string()),
            contact.work_phone,
            contact.cell_phone,
            contact.email,
            contact.website,
            contact.address_id.map(|id| id.to_string()),
            contact.id.to_string(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, contact_id: Id<Contact>) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM contacts WHERE id = ?1",
        params![contact_id.to_string()],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, contact_id: Id<Contact>) -> AbookResult<Option<Contact>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM contacts WHERE id = ?1", COLUMNS))?;

    let result = stmt.query_row(params![contact_id.to_string()], row_to_tuple);
    match result {
        Ok(row) => Ok(Some(tuple_to_contact(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> AbookResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts ORDER BY last_name, first_name",
        COLUMNS
    ))?;

    let rows: Vec<ContactRow> = stmt
        .query_map([], row_to_tuple)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(tuple_to_contact).collect()
}

/// The contact set of an address, in creation order. The order is
/// deterministic: it decides which contacts fill the primary/secondary
/// slots during re-derivation.
pub fn find_by_address(conn: &Connection, address_id: Id<Address>) -> AbookResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts WHERE address_id = ?1 ORDER BY created_at, rowid",
        COLUMNS
    ))?;

    let rows: Vec<ContactRow> = stmt
        .query_map(params![address_id.to_string()], row_to_tuple)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(tuple_to_contact).collect()
}

pub fn count_by_address(conn: &Connection, address_id: Id<Address>) -> AbookResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE address_id = ?1",
        params![address_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Null the address reference, but only while it still points at the given
/// address. Keeps a concurrent reassignment from being clobbered.
pub fn clear_address_if(
    conn: &Connection,
    contact_id: Id<Contact>,
    address_id: Id<Address>,
) -> AbookResult<()> {
    conn.execute(
        "UPDATE contacts SET address_id = NULL WHERE id = ?1 AND address_id = ?2",
        params![contact_id.to_string(), address_id.to_string()],
    )?;
    Ok(())
}

pub fn find_by_last_name_prefix(conn: &Connection, prefix: &str) -> AbookResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts WHERE upper(last_name) LIKE ?1 ORDER BY last_name, first_name",
        COLUMNS
    ))?;

    let pattern = format!("{}%", prefix.to_uppercase().replace(['%', '_'], ""));
    let rows: Vec<ContactRow> = stmt
        .query_map(params![pattern], row_to_tuple)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(tuple_to_contact).collect()
}

fn row_to_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContactRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn tuple_to_contact(row: ContactRow) -> AbookResult<Contact> {
    let (
        id,
        prefix,
        first_name,
        middle_name,
        last_name,
        birthday,
        work_phone,
        cell_phone,
        email,
        website,
        address_id,
    ) = row;

    let birthday = birthday
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| AbookError::Other(format!("Invalid date: {}", e)))
        })
        .transpose()?;

    Ok(Contact {
        id: parse_id(&id)?,
        prefix,
        first_name,
        middle_name,
        last_name,
        birthday,
        work_phone,
        cell_phone,
        email,
        website,
        address_id: parse_optional_id(address_id)?,
    })
}
