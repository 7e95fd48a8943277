use rusqlite::{params, Connection};

use super::parse_id;
use crate::error::AbookResult;
use crate::model::{Address, Group, Id};

pub fn insert(conn: &Connection, group: &Group) -> AbookResult<()> {
    conn.execute(
        "INSERT INTO groups (id, name) VALUES (?1, ?2)",
        params![group.id.to_string(), group.name],
    )?;

    for address_id in &group.address_ids {
        conn.execute(
            "INSERT INTO group_addresses (group_id, address_id) VALUES (?1, ?2)",
            params![group.id.to_string(), address_id.to_string()],
        )?;
    }

    Ok(())
}

pub fn update(conn: &Connection, group: &Group) -> AbookResult<()> {
    conn.execute(
        "UPDATE groups SET name = ?1 WHERE id = ?2",
        params![group.name, group.id.to_string()],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, group_id: Id<Group>) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM group_addresses WHERE group_id = ?1",
        params![group_id.to_string()],
    )?;
    conn.execute(
        "DELETE FROM groups WHERE id = ?1",
        params![group_id.to_string()],
    )?;
    Ok(())
}

pub fn add_address(
    conn: &Connection,
    group_id: Id<Group>,
    address_id: Id<Address>,
) -> AbookResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO group_addresses (group_id, address_id) VALUES (?1, ?2)",
        params![group_id.to_string(), address_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_address(
    conn: &Connection,
    group_id: Id<Group>,
    address_id: Id<Address>,
) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM group_addresses WHERE group_id = ?1 AND address_id = ?2",
        params![group_id.to_string(), address_id.to_string()],
    )?;
    Ok(())
}

/// Drop an address from every group. Part of address destruction.
pub fn remove_address_from_all(conn: &Connection, address_id: Id<Address>) -> AbookResult<()> {
    conn.execute(
        "DELETE FROM group_addresses WHERE address_id = ?1",
        params![address_id.to_string()],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, group_id: Id<Group>) -> AbookResult<Option<Group>> {
    let mut stmt = conn.prepare("SELECT id, name FROM groups WHERE id = ?1")?;

    let result = stmt.query_row(params![group_id.to_string()], |row| {
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        Ok((id, name))
    });

    match result {
        Ok((id, name)) => {
            let id = parse_id(&id)?;
            Ok(Some(Group {
                id,
                name,
                address_ids: find_address_ids(conn, id)?,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> AbookResult<Vec<Group>> {
    let mut stmt = conn.prepare("SELECT id, name FROM groups ORDER BY name")?;

    let rows: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups = Vec::new();
    for (id, name) in rows {
        let id = parse_id(&id)?;
        groups.push(Group {
            id,
            name,
            address_ids: find_address_ids(conn, id)?,
        });
    }

    Ok(groups)
}

pub fn find_by_name(conn: &Connection, name: &str) -> AbookResult<Option<Group>> {
    let groups = find_all(conn)?;
    Ok(groups
        .into_iter()
        .find(|g| g.name.eq_ignore_ascii_case(name)))
}

fn find_address_ids(conn: &Connection, group_id: Id<Group>) -> AbookResult<Vec<Id<Address>>> {
    let mut stmt =
        conn.prepare("SELECT address_id FROM group_addresses WHERE group_id = ?1")?;

    let ids: Vec<String> = stmt
        .query_map(params![group_id.to_string()], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    ids.iter().map(|s| parse_id(s)).collect()
}
