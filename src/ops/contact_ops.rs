use chrono::NaiveDate;
use rusqlite::Connection;

use super::{address_ops, OrphanPolicy};
use crate::db::{address_repo, contact_repo, staged_edit_repo};
use crate::error::{AbookError, AbookResult};
use crate::model::{Address, AddressTypeKind, Contact, Id};
use crate::validation::ValidationErrors;

/// Personal fields of a contact create/update request. Applied wholesale,
/// the way a submitted form replaces what was there.
#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub prefix: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub work_phone: Option<String>,
    pub cell_phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl ContactInput {
    fn apply(&self, contact: &mut Contact) {
        contact.prefix = self.prefix.clone();
        contact.first_name = self.first_name.clone();
        contact.middle_name = self.middle_name.clone();
        contact.last_name = self.last_name.clone();
        contact.birthday = self.birthday;
        contact.work_phone = self.work_phone.clone();
        contact.cell_phone = self.cell_phone.clone();
        contact.email = self.email.clone();
        contact.website = self.website.clone();
    }
}

/// Submitted values for a candidate address.
#[derive(Debug, Clone, Default)]
pub struct AddressFields {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub home_phone: String,
    pub address_type: Option<AddressTypeKind>,
    pub primary_contact_id: Option<Id<Contact>>,
    pub secondary_contact_id: Option<Id<Contact>>,
}

impl AddressFields {
    fn into_address(self) -> Address {
        let mut address = Address::create();
        address.address1 = self.address1;
        address.address2 = self.address2;
        address.city = self.city;
        address.state = self.state;
        address.zip = self.zip;
        address.home_phone = self.home_phone;
        address.address_type = self.address_type;
        address.primary_contact_id = self.primary_contact_id;
        address.secondary_contact_id = self.secondary_contact_id;
        address
    }
}

/// The three shapes an address specification can take.
#[derive(Debug, Clone)]
pub enum AddressSpec {
    /// No address information submitted.
    None,
    /// "Use this other contact's address" (shares the same row).
    ExistingOf(Id<Contact>),
    /// A fully specified set of values for a new or edited address.
    Fields(AddressFields),
}

/// Result of a contact update.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Saved {
        contact: Contact,
        /// Whether the address set changed; callers refresh their address
        /// list when it did.
        address_changed: bool,
    },
    /// The contact's current address is shared. Personal fields were saved,
    /// but the address edit is staged until the user picks a scope.
    ConfirmationRequired {
        contact: Contact,
        sharer_count: usize,
    },
}

/// The user's answer to "this address is shared by N contacts".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedEditChoice {
    /// Edit the shared row in place; every linked contact sees the change.
    ApplyToAll,
    /// Leave the shared row alone; give this contact its own copy.
    PrivateCopy,
}

pub fn create_contact(
    conn: &Connection,
    input: &ContactInput,
    spec: &AddressSpec,
    policy: OrphanPolicy,
) -> AbookResult<Contact> {
    let mut contact = Contact::create(input.first_name.clone(), input.last_name.clone());
    input.apply(&mut contact);
    contact.validate().into_result()?;

    let candidate = parse_address_spec(conn, spec)?;
    if let Some(candidate) = &candidate {
        check_candidate(candidate, spec)?;
    }

    contact_repo::insert(conn, &contact)?;

    if let Some(candidate) = candidate {
        if candidate.validate().is_empty() {
            attach_address(conn, &mut contact, None, candidate, policy)?;
        }
    }

    Ok(contact)
}

/// Apply a contact update bundling personal fields and an address
/// specification. Decides between: no address change, create-new, update
/// the shared row for everyone, or fork a private copy — deferring to the
/// user (via a staged edit) when the current address is shared.
pub fn update_contact(
    conn: &Connection,
    session_key: &str,
    contact_id: Id<Contact>,
    input: &ContactInput,
    spec: &AddressSpec,
    policy: OrphanPolicy,
) -> AbookResult<UpdateOutcome> {
    let mut contact = contact_repo::find_by_id(conn, contact_id)?
        .ok_or_else(|| AbookError::not_found("Contact", contact_id))?;

    input.apply(&mut contact);
    contact.validate().into_result()?;

    let current = match contact.address_id {
        Some(id) => address_repo::find_by_id(conn, id)?,
        None => None,
    };

    let mut address_changed = false;
    if let Some(candidate) = parse_address_spec(conn, spec)? {
        check_candidate(&candidate, spec)?;

        if candidate.validate().is_empty() && candidate.different_from(current.as_ref()) {
            let sharer_count = match &current {
                Some(address) => contact_repo::count_by_address(conn, address.id)?,
                None => 0,
            };

            if sharer_count > 1 {
                staged_edit_repo::stage(
                    conn,
                    session_key,
                    contact.id,
                    &serde_json::to_string(&candidate)?,
                )?;
                contact_repo::update(conn, &contact)?;
                return Ok(UpdateOutcome::ConfirmationRequired {
                    contact,
                    sharer_count,
                });
            }

            let assigning_new = matches!(spec, AddressSpec::ExistingOf(_)) || current.is_none();
            if assigning_new {
                attach_address(conn, &mut contact, current, candidate, policy)?;
            } else {
                copy_onto_current(conn, current, candidate)?;
            }
            address_changed = true;
        }
    }

    contact_repo::update(conn, &contact)?;
    Ok(UpdateOutcome::Saved {
        contact,
        address_changed,
    })
}

/// Finish a deferred shared-address edit with the user's scope choice.
/// Consumes the staged snapshot; an absent or expired one is a not-found.
pub fn resolve_shared_edit(
    conn: &Connection,
    session_key: &str,
    choice: SharedEditChoice,
    policy: OrphanPolicy,
) -> AbookResult<Contact> {
    let staged = staged_edit_repo::take(conn, session_key)?
        .ok_or_else(|| AbookError::not_found("Staged edit", session_key))?;

    let mut contact = contact_repo::find_by_id(conn, staged.contact_id)?
        .ok_or_else(|| AbookError::not_found("Contact", staged.contact_id))?;

    let snapshot: Address = serde_json::from_str(&staged.payload)?;
    let candidate = match address_repo::find_by_id(conn, snapshot.id)? {
        Some(mut existing) => {
            existing.assign_fields_from(&snapshot);
            existing
        }
        None => snapshot,
    };

    let current = match contact.address_id {
        Some(id) => address_repo::find_by_id(conn, id)?,
        None => None,
    };

    let assigning_new = choice == SharedEditChoice::PrivateCopy || current.is_none();
    if assigning_new {
        attach_address(conn, &mut contact, current, candidate, policy)?;
    } else {
        copy_onto_current(conn, current, candidate)?;
    }

    contact_repo::update(conn, &contact)?;
    Ok(contact)
}

/// Detach a contact's address without touching its other fields. Returns
/// the detached address id, if there was one.
pub fn remove_address(
    conn: &Connection,
    contact_id: Id<Contact>,
    policy: OrphanPolicy,
) -> AbookResult<Option<Id<Address>>> {
    let mut contact = contact_repo::find_by_id(conn, contact_id)?
        .ok_or_else(|| AbookError::not_found("Contact", contact_id))?;

    let Some(address_id) = contact.address_id else {
        return Ok(None);
    };

    if let Some(mut address) = address_repo::find_by_id(conn, address_id)? {
        address_ops::unlink_contact(conn, &mut address, contact.id)?;
        address_ops::cleanup_orphaned(conn, address_id, policy)?;
    } else {
        contact.address_id = None;
        contact_repo::update(conn, &contact)?;
    }

    Ok(Some(address_id))
}

/// Delete a contact. Its designations are withdrawn from every address and
/// its own address is unlinked (and cleaned up when orphaned) first.
pub fn delete_contact(
    conn: &Connection,
    contact_id: Id<Contact>,
    policy: OrphanPolicy,
) -> AbookResult<()> {
    contact_repo::find_by_id(conn, contact_id)?
        .ok_or_else(|| AbookError::not_found("Contact", contact_id))?;

    address_ops::remove_contact(conn, contact_id, policy)?;
    remove_address(conn, contact_id, policy)?;
    contact_repo::delete(conn, contact_id)
}

fn parse_address_spec(conn: &Connection, spec: &AddressSpec) -> AbookResult<Option<Address>> {
    match spec {
        AddressSpec::None => Ok(None),
        AddressSpec::ExistingOf(other_id) => {
            let other = contact_repo::find_by_id(conn, *other_id)?;
            match other.and_then(|c| c.address_id) {
                Some(address_id) => address_repo::find_by_id(conn, address_id),
                None => Ok(None),
            }
        }
        AddressSpec::Fields(fields) => Ok(Some(fields.clone().into_address())),
    }
}

/// An explicitly specified candidate must itself be valid; anything else
/// blocks the whole update so the form can be corrected.
fn check_candidate(candidate: &Address, spec: &AddressSpec) -> AbookResult<()> {
    if matches!(spec, AddressSpec::Fields(_)) {
        let mut errors = candidate.validate();
        if !errors.is_empty() {
            errors.add_base("Please specify a valid address");
            return Err(AbookError::Invalid(errors));
        }
    }
    Ok(())
}

/// Attach `candidate` as the contact's address (saving it first when it is
/// a new row), re-derive its designations, then unlink the old address and
/// enforce the orphan post-condition on it.
fn attach_address(
    conn: &Connection,
    contact: &mut Contact,
    current: Option<Address>,
    mut candidate: Address,
    policy: OrphanPolicy,
) -> AbookResult<()> {
    address_ops::save(conn, &mut candidate)?;
    contact.address_id = Some(candidate.id);
    contact_repo::update(conn, contact)?;
    address_ops::link_contact(conn, candidate.id)?;

    if let Some(mut old) = current {
        if old.id != candidate.id {
            address_ops::unlink_contact(conn, &mut old, contact.id)?;
            address_ops::cleanup_orphaned(conn, old.id, policy)?;
        }
    }

    Ok(())
}

/// In-place edit: copy the candidate's values (not its identity) onto the
/// contact's existing address row. Designations and type carry over only
/// when the candidate specifies them; an omitted designation is not a
/// request to withdraw one.
fn copy_onto_current(
    conn: &Connection,
    current: Option<Address>,
    candidate: Address,
) -> AbookResult<()> {
    let mut existing = current.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add_base("No address to update");
        AbookError::Invalid(errors)
    })?;

    existing.assign_postal_fields_from(&candidate);
    if candidate.address_type.is_some() {
        existing.address_type = candidate.address_type;
    }
    if candidate.primary_contact_id.is_some() {
        existing.primary_contact_id = candidate.primary_contact_id;
    }
    if candidate.secondary_contact_id.is_some() {
        existing.secondary_contact_id = candidate.secondary_contact_id;
    }

    address_ops::save(conn, &mut existing)
}
