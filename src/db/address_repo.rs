use rusqlite::{params, Connection};

use super::{parse_id, parse_optional_id};
use crate::error::{AbookError, AbookResult};
use crate::model::{Address, AddressTypeKind, Contact, Id};

const COLUMNS: &str =
    "id, address1, address2, city, state, zip, home_phone, address_type, contact1_id, contact2_id";

type AddressRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

pub fn insert(conn: &Connection, address: &Address) -> AbookResult<()> {
    conn.execute(
        "INSERT INTO addresses (id, address1, address2, city, state, zip, home_phone, address_type, contact1_id, contact2_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            address.id.to_string(),
            address.address1,
            address.address2,
            address.city,
            address.state,
            address.zip,
            address.home_phone,
            address.address_type.map(|t| t.to_db_str()),
            address.primary_contact_id.map(|id| id.to_string()),
            address.secondary_contact_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, address: &Address) -> AbookResult<()> {
    conn.execute(
        "UPDATE addresses SET address1 = ?1, address2 = ?2, city = ?3, state = ?4, zip = ?5,
         home_phone = ?6, address_type = ?7, contact1_id = ?8, contact2_id = ?9 WHERE id = ?10",
        params![
            address.address1,
            address.address2,
            address.city,
            address.state,
            address.zip,
            address.home_phone,
            address.address_type.map(|t| t.to_db_str()),
            address.primary_contact_id.map(|id| id.to_string()),
            address.secondary_contact_id.map(|id| id.to_string()),
            address.id.to_string(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, address_id: Id<Address>) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM addresses WHERE id = ?1",
        params![address_id.to_string()],
    )?;
    Ok(())
}

pub fn exists(conn: &Connection, address_id: Id<Address>) -> AbookResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM addresses WHERE id = ?1",
        params![address_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn find_by_id(conn: &Connection, address_id: Id<Address>) -> AbookResult<Option<Address>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM addresses WHERE id = ?1", COLUMNS))?;

    let result = stmt.query_row(params![address_id.to_string()], row_to_tuple);
    match result {
        Ok(row) => Ok(Some(tuple_to_address(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All addresses in creation order.
pub fn find_all(conn: &Connection) -> AbookResult<Vec<Address>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM addresses ORDER BY created_at, rowid",
        COLUMNS
    ))?;

    let rows: Vec<AddressRow> = stmt
        .query_map([], row_to_tuple)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(tuple_to_address).collect()
}

/// Addresses designating this contact as primary or secondary.
pub fn find_designating(conn: &Connection, contact_id: Id<Contact>) -> AbookResult<Vec<Address>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM addresses WHERE contact1_id = ?1 OR contact2_id = ?1 ORDER BY created_at, rowid",
        COLUMNS
    ))?;

    let rows: Vec<AddressRow> = stmt
        .query_map(params![contact_id.to_string()], row_to_tuple)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(tuple_to_address).collect()
}

fn row_to_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<AddressRow> {
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
    ))
}

fn tuple_to_address(row: AddressRow) -> AbookResult<Address> {
    let (id, address1, address2, city, state, zip, home_phone, address_type, contact1, contact2) =
        row;

    let address_type = address_type
        .map(|s| {
            AddressTypeKind::from_db_str(&s)
                .ok_or_else(|| AbookError::Other(format!("Unknown address type: {}", s)))
        })
        .transpose()?;

    Ok(Address {
        id: parse_id(&id)?,
        address1,
        address2,
        city,
        state,
        zip,
        home_phone,
        address_type,
        primary_contact_id: parse_optional_id(contact1)?,
        secondary_contact_id: parse_optional_id(contact2)?,
    })
}
