use rusqlite::Connection;

use crate::db::{address_repo, group_repo};
use crate::error::{AbookError, AbookResult};
use crate::model::{Address, Group, Id};
use crate::validation::{self, ValidationErrors};

pub fn create_group(conn: &Connection, name: &str) -> AbookResult<Group> {
    let valid_name = validation::non_blank(name, "name")?;

    if group_repo::find_by_name(conn, &valid_name)?.is_some() {
        return Err(AbookError::AlreadyExists {
            entity_type: "Group".into(),
            identifier: valid_name,
        });
    }

    let group = Group::create(valid_name);
    group_repo::insert(conn, &group)?;
    Ok(group)
}

pub fn rename_group(conn: &Connection, group_id: Id<Group>, name: &str) -> AbookResult<Group> {
    let mut group = group_repo::find_by_id(conn, group_id)?
        .ok_or_else(|| AbookError::not_found("Group", group_id))?;

    let valid_name = validation::non_blank(name, "name")?;
    if let Some(existing) = group_repo::find_by_name(conn, &valid_name)? {
        if existing.id != group_id {
            return Err(AbookError::AlreadyExists {
                entity_type: "Group".into(),
                identifier: valid_name,
            });
        }
    }

    group.name = valid_name;
    group_repo::update(conn, &group)?;
    Ok(group)
}

pub fn delete_group(conn: &Connection, group_id: Id<Group>) -> AbookResult<()> {
    group_repo::find_by_id(conn, group_id)?
        .ok_or_else(|| AbookError::not_found("Group", group_id))?;

    group_repo::delete(conn, group_id)
}

/// Add an address to a group. Only addresses with a street line are
/// eligible; adding one twice is a no-op.
pub fn add_address(
    conn: &Connection,
    group_id: Id<Group>,
    address_id: Id<Address>,
) -> AbookResult<Group> {
    let group = group_repo::find_by_id(conn, group_id)?
        .ok_or_else(|| AbookError::not_found("Group", group_id))?;
    let address = address_repo::find_by_id(conn, address_id)?
        .ok_or_else(|| AbookError::not_found("Address", address_id))?;

    if address.address1.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add_base("Only addresses with a street address can be added to a group");
        return Err(AbookError::Invalid(errors));
    }

    group_repo::add_address(conn, group_id, address_id)?;
    Ok(group_repo::find_by_id(conn, group_id)?.unwrap_or(group))
}

pub fn remove_address(
    conn: &Connection,
    group_id: Id<Group>,
    address_id: Id<Address>,
) -> AbookResult<Group> {
    let group = group_repo::find_by_id(conn, group_id)?
        .ok_or_else(|| AbookError::not_found("Group", group_id))?;

    group_repo::remove_address(conn, group_id, address_id)?;
    Ok(group_repo::find_by_id(conn, group_id)?.unwrap_or(group))
}
