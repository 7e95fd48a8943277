use rusqlite::Connection;

use super::OrphanPolicy;
use crate::db::{address_repo, contact_repo, group_repo};
use crate::error::{AbookError, AbookResult};
use crate::model::{Address, AddressTypeKind, Contact, Id};

/// Result of dropping one contact from an address's contact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    /// Other contacts remain; designations and type were re-derived.
    Relinked,
    /// The contact set is now empty. The caller decides the row's fate via
    /// [`cleanup_orphaned`].
    Orphaned,
}

/// Normalize, validate, and persist. Inserts on first save, updates after.
pub fn save(conn: &Connection, address: &mut Address) -> AbookResult<()> {
    address.normalize();
    address.validate().into_result()?;

    if address_repo::exists(conn, address.id)? {
        address_repo::update(conn, address)
    } else {
        address_repo::insert(conn, address)
    }
}

/// Re-derive designations after a contact gained this address.
pub fn link_contact(conn: &Connection, address_id: Id<Address>) -> AbookResult<Address> {
    let mut address = address_repo::find_by_id(conn, address_id)?
        .ok_or_else(|| AbookError::not_found("Address", address_id))?;
    adjust_primary_secondary_contacts(conn, &mut address)?;
    Ok(address)
}

/// Drop `contact_id` from the address's contact set: null its address
/// reference, clear it from either designation slot, and re-derive if any
/// contacts remain. Destruction of an orphaned row is not done here; it is
/// a separate post-condition so callers can apply a policy.
pub fn unlink_contact(
    conn: &Connection,
    address: &mut Address,
    contact_id: Id<Contact>,
) -> AbookResult<UnlinkOutcome> {
    if address.primary_contact_id == Some(contact_id) {
        address.primary_contact_id = None;
    }
    if address.secondary_contact_id == Some(contact_id) {
        address.secondary_contact_id = None;
    }
    contact_repo::clear_address_if(conn, contact_id, address.id)?;

    if contact_repo::count_by_address(conn, address.id)? == 0 {
        // Persist the cleared designations without re-validating: the row is
        // either about to be destroyed or kept as a contactless record.
        address_repo::update(conn, address)?;
        Ok(UnlinkOutcome::Orphaned)
    } else {
        adjust_primary_secondary_contacts(conn, address)?;
        Ok(UnlinkOutcome::Relinked)
    }
}

/// Post-condition after any unlink: an address with no linked contacts is
/// removed, subject to the orphan policy. Returns whether the row was
/// destroyed.
pub fn cleanup_orphaned(
    conn: &Connection,
    address_id: Id<Address>,
    policy: OrphanPolicy,
) -> AbookResult<bool> {
    let Some(address) = address_repo::find_by_id(conn, address_id)? else {
        return Ok(false);
    };
    if contact_repo::count_by_address(conn, address_id)? > 0 {
        return Ok(false);
    }

    let destroy = match policy {
        OrphanPolicy::Destroy => true,
        OrphanPolicy::KeepStandalone => address.is_empty(),
    };
    if !destroy {
        return Ok(false);
    }

    group_repo::remove_address_from_all(conn, address_id)?;
    address_repo::delete(conn, address_id)?;
    Ok(true)
}

/// Global removal: unlink the contact from every address that designates it
/// as primary or secondary, cleaning up orphans. Used when a contact is
/// deleted.
pub fn remove_contact(
    conn: &Connection,
    contact_id: Id<Contact>,
    policy: OrphanPolicy,
) -> AbookResult<()> {
    for mut address in address_repo::find_designating(conn, contact_id)? {
        unlink_contact(conn, &mut address, contact_id)?;
        cleanup_orphaned(conn, address.id, policy)?;
    }
    Ok(())
}

/// Re-derive the primary/secondary designations and the address type from
/// the current contact set.
///
/// The first two contacts (creation order) are the candidates. An empty
/// slot is filled from its candidate; a slot whose candidate is gone is
/// cleared; if both slots end up pointing at the same contact, one is moved
/// to the other candidate. The type follows the result: one designation is
/// an individual address, two a family one, none leaves it untouched.
pub fn adjust_primary_secondary_contacts(
    conn: &Connection,
    address: &mut Address,
) -> AbookResult<()> {
    let linked = contact_repo::find_by_address(conn, address.id)?;
    let first = linked.first().map(|c| c.id);
    let second = linked.get(1).map(|c| c.id);

    if address.primary_contact_id.is_none() && first.is_some() {
        address.primary_contact_id = first;
    } else if first.is_none() {
        address.primary_contact_id = None;
    }

    if address.secondary_contact_id.is_none() && second.is_some() {
        address.secondary_contact_id = second;
    } else if second.is_none() {
        address.secondary_contact_id = None;
    }

    if address.primary_contact_id == address.secondary_contact_id
        && address.primary_contact_id.is_some()
    {
        if address.primary_contact_id == first {
            address.primary_contact_id = second;
        } else {
            address.primary_contact_id = first;
        }
    }

    match (
        address.primary_contact_id.is_some(),
        address.secondary_contact_id.is_some(),
    ) {
        (true, false) => address.address_type = Some(AddressTypeKind::Individual),
        (true, true) => address.address_type = Some(AddressTypeKind::Family),
        _ => {}
    }

    save(conn, address)
}
