use abook::db::*;
use abook::error::AbookError;
use abook::model::*;
use abook::ops::address_ops::{self, UnlinkOutcome};
use abook::ops::contact_ops::{
    self, AddressFields, AddressSpec, ContactInput, SharedEditChoice, UpdateOutcome,
};
use abook::ops::group_ops;
use abook::ops::OrphanPolicy;

fn setup() -> rusqlite::Connection {
    schema::test_connection()
}

fn input(first: &str, last: &str) -> ContactInput {
    ContactInput {
        first_name: first.into(),
        last_name: last.into(),
        ..ContactInput::default()
    }
}

fn street_fields(street: &str) -> AddressFields {
    AddressFields {
        address1: street.into(),
        city: "Chicago".into(),
        state: "IL".into(),
        zip: "60601".into(),
        ..AddressFields::default()
    }
}

fn add_with_address(conn: &rusqlite::Connection, first: &str, last: &str, street: &str) -> Contact {
    contact_ops::create_contact(
        conn,
        &input(first, last),
        &AddressSpec::Fields(street_fields(street)),
        OrphanPolicy::Destroy,
    )
    .unwrap()
}

fn address_of(conn: &rusqlite::Connection, contact: &Contact) -> Address {
    let contact = contact_repo::find_by_id(conn, contact.id).unwrap().unwrap();
    address_repo::find_by_id(conn, contact.address_id.unwrap())
        .unwrap()
        .unwrap()
}

// ==========================================================================
// CONTACT CREATION
// ==========================================================================

#[test]
fn create_contact_without_address() {
    let conn = setup();
    let contact = contact_ops::create_contact(
        &conn,
        &input("Ann", "Smith"),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    assert_eq!(contact.last_name, "Smith");
    assert!(contact.address_id.is_none());
}

#[test]
fn create_contact_rejects_blank_last_name() {
    let conn = setup();
    let result = contact_ops::create_contact(
        &conn,
        &input("Ann", "   "),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    );
    assert!(result.is_err());
}

#[test]
fn create_contact_with_address_designates_it_primary() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");

    let address = address_of(&conn, &ann);
    assert_eq!(address.primary_contact_id, Some(ann.id));
    assert_eq!(address.secondary_contact_id, None);
    assert_eq!(address.address_type, Some(AddressTypeKind::Individual));
}

#[test]
fn create_contact_with_invalid_address_blocks_the_whole_create() {
    let conn = setup();

    let partial = AddressFields {
        address1: "123 Main St".into(),
        ..AddressFields::default()
    };
    let result = contact_ops::create_contact(
        &conn,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(partial),
        OrphanPolicy::Destroy,
    );

    let err = result.unwrap_err();
    let errors = err.validation_errors().expect("validation error");
    assert!(errors.on_base().contains(&"Please specify a valid address"));
    assert!(contact_repo::find_all(&conn).unwrap().is_empty());
}

#[test]
fn create_contact_sharing_another_contacts_address_makes_it_family() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");

    let bob = contact_ops::create_contact(
        &conn,
        &input("Bob", "Smith"),
        &AddressSpec::ExistingOf(ann.id),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    assert_eq!(bob.address_id, ann.address_id);
    let address = address_of(&conn, &ann);
    assert_eq!(address.primary_contact_id, Some(ann.id));
    assert_eq!(address.secondary_contact_id, Some(bob.id));
    assert_eq!(address.address_type, Some(AddressTypeKind::Family));
}

#[test]
fn create_contact_referencing_contact_without_address_skips_address() {
    let conn = setup();
    let ann = contact_ops::create_contact(
        &conn,
        &input("Ann", "Smith"),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let bob = contact_ops::create_contact(
        &conn,
        &input("Bob", "Smith"),
        &AddressSpec::ExistingOf(ann.id),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    assert!(bob.address_id.is_none());
}

// ==========================================================================
// CONTACT UPDATE / COORDINATION WORKFLOW
// ==========================================================================

#[test]
fn update_without_address_spec_changes_only_personal_fields() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");

    let outcome = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Jones"),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    match outcome {
        UpdateOutcome::Saved {
            contact,
            address_changed,
        } => {
            assert_eq!(contact.last_name, "Jones");
            assert!(!address_changed);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(address_repo::find_all(&conn).unwrap().len(), 1);
}

#[test]
fn update_with_identical_address_values_is_a_noop() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");

    let outcome = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("123 Main St")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    match outcome {
        UpdateOutcome::Saved { address_changed, .. } => assert!(!address_changed),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(address_repo::find_all(&conn).unwrap().len(), 1);
}

#[test]
fn update_unshared_address_edits_it_in_place() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let original = address_of(&conn, &ann);

    let outcome = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("456 Oak Ave")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    match outcome {
        UpdateOutcome::Saved { address_changed, .. } => assert!(address_changed),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let updated = address_of(&conn, &ann);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.address1, "456 Oak Ave");
    assert_eq!(updated.primary_contact_id, Some(ann.id));
    assert_eq!(address_repo::find_all(&conn).unwrap().len(), 1);
}

#[test]
fn update_adding_first_address_attaches_a_new_row() {
    let conn = setup();
    let ann = contact_ops::create_contact(
        &conn,
        &input("Ann", "Smith"),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let outcome = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("123 Main St")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    match outcome {
        UpdateOutcome::Saved {
            contact,
            address_changed,
        } => {
            assert!(address_changed);
            assert!(contact.address_id.is_some());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn update_with_invalid_address_blocks_and_reports_base_error() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");

    let partial = AddressFields {
        city: "Chicago".into(),
        ..AddressFields::default()
    };
    let result = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Changed"),
        &AddressSpec::Fields(partial),
        OrphanPolicy::Destroy,
    );

    let err = result.unwrap_err();
    let errors = err.validation_errors().expect("validation error");
    assert!(errors.on_base().contains(&"Please specify a valid address"));

    // The blocked update must not have touched the personal fields either.
    let stored = contact_repo::find_by_id(&conn, ann.id).unwrap().unwrap();
    assert_eq!(stored.last_name, "Smith");
}

#[test]
fn switching_to_another_contacts_address_cleans_up_the_orphan() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let bob = add_with_address(&conn, "Bob", "Adams", "456 Oak Ave");
    let old_address_id = ann.address_id.unwrap();

    let outcome = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::ExistingOf(bob.id),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    match outcome {
        UpdateOutcome::Saved { contact, .. } => {
            assert_eq!(contact.address_id, bob.address_id);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // Ann's previous address lost its last contact and was destroyed.
    assert!(address_repo::find_by_id(&conn, old_address_id).unwrap().is_none());

    // Re-derivation works from contact creation order: Ann precedes Bob, so
    // the collision fix hands her the primary slot.
    let shared = address_of(&conn, &bob);
    assert_eq!(shared.primary_contact_id, Some(ann.id));
    assert_eq!(shared.secondary_contact_id, Some(bob.id));
    assert_eq!(shared.address_type, Some(AddressTypeKind::Family));
}

// ==========================================================================
// SHARED-ADDRESS EDITS
// ==========================================================================

fn shared_pair(conn: &rusqlite::Connection) -> (Contact, Contact, Address) {
    let ann = add_with_address(conn, "Ann", "Smith", "123 Main St");
    let bob = contact_ops::create_contact(
        conn,
        &input("Bob", "Smith"),
        &AddressSpec::ExistingOf(ann.id),
        OrphanPolicy::Destroy,
    )
    .unwrap();
    let address = address_of(conn, &ann);
    (ann, bob, address)
}

#[test]
fn editing_a_shared_address_requires_confirmation() {
    let conn = setup();
    let (ann, _bob, address) = shared_pair(&conn);

    let outcome = contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("456 Oak Ave")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    match outcome {
        UpdateOutcome::ConfirmationRequired { sharer_count, .. } => {
            assert_eq!(sharer_count, 2);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // Nothing moved yet: the edit is only staged.
    let stored = address_repo::find_by_id(&conn, address.id).unwrap().unwrap();
    assert_eq!(stored.address1, "123 Main St");
}

#[test]
fn apply_to_all_updates_the_shared_row_in_place() {
    let conn = setup();
    let (ann, bob, address) = shared_pair(&conn);

    contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("456 Oak Ave")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    contact_ops::resolve_shared_edit(
        &conn,
        "sess-1",
        SharedEditChoice::ApplyToAll,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let stored = address_repo::find_by_id(&conn, address.id).unwrap().unwrap();
    assert_eq!(stored.address1, "456 Oak Ave");

    // Both contacts still reference the same (updated) row.
    let ann = contact_repo::find_by_id(&conn, ann.id).unwrap().unwrap();
    let bob = contact_repo::find_by_id(&conn, bob.id).unwrap().unwrap();
    assert_eq!(ann.address_id, Some(address.id));
    assert_eq!(bob.address_id, Some(address.id));
    assert_eq!(stored.address_type, Some(AddressTypeKind::Family));
}

#[test]
fn private_copy_forks_a_new_address_and_leaves_the_shared_one_alone() {
    let conn = setup();
    let (ann, bob, address) = shared_pair(&conn);

    contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("456 Oak Ave")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let ann = contact_ops::resolve_shared_edit(
        &conn,
        "sess-1",
        SharedEditChoice::PrivateCopy,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    // Ann got her own copy with the submitted values.
    let forked = address_of(&conn, &ann);
    assert_ne!(forked.id, address.id);
    assert_eq!(forked.address1, "456 Oak Ave");
    assert_eq!(forked.primary_contact_id, Some(ann.id));
    assert_eq!(forked.address_type, Some(AddressTypeKind::Individual));

    // The shared row kept its values; Bob was promoted to primary.
    let stored = address_repo::find_by_id(&conn, address.id).unwrap().unwrap();
    assert_eq!(stored.address1, "123 Main St");
    assert_eq!(stored.primary_contact_id, Some(bob.id));
    assert_eq!(stored.secondary_contact_id, None);
    assert_eq!(stored.address_type, Some(AddressTypeKind::Individual));
}

#[test]
fn resolving_without_a_staged_edit_is_not_found() {
    let conn = setup();
    let result = contact_ops::resolve_shared_edit(
        &conn,
        "sess-1",
        SharedEditChoice::ApplyToAll,
        OrphanPolicy::Destroy,
    );
    assert!(matches!(result, Err(AbookError::NotFound { .. })));
}

#[test]
fn an_expired_staged_edit_cannot_be_resolved() {
    let conn = setup();
    let (ann, _bob, _address) = shared_pair(&conn);

    contact_ops::update_contact(
        &conn,
        "sess-1",
        ann.id,
        &input("Ann", "Smith"),
        &AddressSpec::Fields(street_fields("456 Oak Ave")),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    staged_edit_repo::backdate(&conn, "sess-1", staged_edit_repo::STAGED_EDIT_TTL_MINUTES + 1)
        .unwrap();

    let result = contact_ops::resolve_shared_edit(
        &conn,
        "sess-1",
        SharedEditChoice::ApplyToAll,
        OrphanPolicy::Destroy,
    );
    assert!(matches!(result, Err(AbookError::NotFound { .. })));
}

// ==========================================================================
// UNLINK / RE-DERIVATION / ORPHAN CLEANUP
// ==========================================================================

#[test]
fn designations_stay_distinct_after_rederivation() {
    let conn = setup();
    let (ann, _bob, _address) = shared_pair(&conn);

    let carol = contact_ops::create_contact(
        &conn,
        &input("Carol", "Smith"),
        &AddressSpec::ExistingOf(ann.id),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let address = address_of(&conn, &carol);
    assert!(address.primary_contact_id.is_some());
    assert_ne!(address.primary_contact_id, address.secondary_contact_id);
}

#[test]
fn deleting_the_secondary_promotes_the_next_linked_contact() {
    let conn = setup();
    let (ann, bob, _) = shared_pair(&conn);

    let carol = contact_ops::create_contact(
        &conn,
        &input("Carol", "Smith"),
        &AddressSpec::ExistingOf(ann.id),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    contact_ops::delete_contact(&conn, bob.id, OrphanPolicy::Destroy).unwrap();

    let address = address_of(&conn, &ann);
    assert_eq!(address.primary_contact_id, Some(ann.id));
    assert_eq!(address.secondary_contact_id, Some(carol.id));
    assert_eq!(address.address_type, Some(AddressTypeKind::Family));
}

#[test]
fn removing_one_of_two_contacts_rederives_individual() {
    let conn = setup();
    let (ann, bob, address) = shared_pair(&conn);

    contact_ops::delete_contact(&conn, ann.id, OrphanPolicy::Destroy).unwrap();

    let stored = address_repo::find_by_id(&conn, address.id).unwrap().unwrap();
    assert_eq!(stored.primary_contact_id, Some(bob.id));
    assert_eq!(stored.secondary_contact_id, None);
    assert_eq!(stored.address_type, Some(AddressTypeKind::Individual));
}

#[test]
fn removing_the_last_contact_destroys_the_address() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let address_id = ann.address_id.unwrap();

    contact_ops::delete_contact(&conn, ann.id, OrphanPolicy::Destroy).unwrap();

    assert!(contact_repo::find_by_id(&conn, ann.id).unwrap().is_none());
    assert!(address_repo::find_by_id(&conn, address_id).unwrap().is_none());
}

#[test]
fn keep_standalone_policy_preserves_an_address_with_data() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let address_id = ann.address_id.unwrap();

    contact_ops::delete_contact(&conn, ann.id, OrphanPolicy::KeepStandalone).unwrap();

    let survivor = address_repo::find_by_id(&conn, address_id).unwrap().unwrap();
    assert_eq!(survivor.address1, "123 Main St");
    assert_eq!(survivor.primary_contact_id, None);
    assert_eq!(survivor.secondary_contact_id, None);
}

#[test]
fn unlink_reports_orphaned_when_the_set_empties() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let mut address = address_of(&conn, &ann);

    let outcome = address_ops::unlink_contact(&conn, &mut address, ann.id).unwrap();
    assert_eq!(outcome, UnlinkOutcome::Orphaned);
    assert!(address_ops::cleanup_orphaned(&conn, address.id, OrphanPolicy::Destroy).unwrap());
}

#[test]
fn cleanup_is_a_noop_while_contacts_remain() {
    let conn = setup();
    let (_ann, _bob, address) = shared_pair(&conn);

    let destroyed =
        address_ops::cleanup_orphaned(&conn, address.id, OrphanPolicy::Destroy).unwrap();
    assert!(!destroyed);
    assert!(address_repo::exists(&conn, address.id).unwrap());
}

#[test]
fn save_rejects_family_address_without_secondary() {
    let conn = setup();
    let ann = contact_ops::create_contact(
        &conn,
        &input("Ann", "Smith"),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let mut address = Address::create();
    address.address1 = "123 Main St".into();
    address.city = "Chicago".into();
    address.state = "IL".into();
    address.zip = "60601".into();
    address.address_type = Some(AddressTypeKind::Family);
    address.primary_contact_id = Some(ann.id);

    let result = address_ops::save(&conn, &mut address);
    let err = result.unwrap_err();
    let errors = err.validation_errors().expect("validation error");
    assert!(errors
        .on_base()
        .contains(&"This address type requires primary and secondary contacts be specified"));
}

// ==========================================================================
// REMOVE ADDRESS
// ==========================================================================

#[test]
fn remove_address_detaches_and_destroys_the_orphan() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let address_id = ann.address_id.unwrap();

    let removed = contact_ops::remove_address(&conn, ann.id, OrphanPolicy::Destroy).unwrap();
    assert_eq!(removed, Some(address_id));

    let stored = contact_repo::find_by_id(&conn, ann.id).unwrap().unwrap();
    assert!(stored.address_id.is_none());
    assert!(address_repo::find_by_id(&conn, address_id).unwrap().is_none());
}

#[test]
fn remove_address_without_one_returns_none() {
    let conn = setup();
    let ann = contact_ops::create_contact(
        &conn,
        &input("Ann", "Smith"),
        &AddressSpec::None,
        OrphanPolicy::Destroy,
    )
    .unwrap();

    assert_eq!(
        contact_ops::remove_address(&conn, ann.id, OrphanPolicy::Destroy).unwrap(),
        None
    );
}

// ==========================================================================
// GROUP OPS
// ==========================================================================

#[test]
fn create_group_rejects_blank_and_duplicate_names() {
    let conn = setup();

    assert!(group_ops::create_group(&conn, "  ").is_err());
    group_ops::create_group(&conn, "Cards").unwrap();
    assert!(matches!(
        group_ops::create_group(&conn, "cards"),
        Err(AbookError::AlreadyExists { .. })
    ));
}

#[test]
fn rename_group_checks_for_collisions() {
    let conn = setup();

    let cards = group_ops::create_group(&conn, "Cards").unwrap();
    group_ops::create_group(&conn, "Bowling").unwrap();

    assert!(group_ops::rename_group(&conn, cards.id, "Bowling").is_err());
    let renamed = group_ops::rename_group(&conn, cards.id, "Holiday cards").unwrap();
    assert_eq!(renamed.name, "Holiday cards");
}

#[test]
fn only_street_addresses_can_join_a_group() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");

    let phone_only_fields = AddressFields {
        home_phone: "3125550100".into(),
        ..AddressFields::default()
    };
    let bob = contact_ops::create_contact(
        &conn,
        &input("Bob", "Adams"),
        &AddressSpec::Fields(phone_only_fields),
        OrphanPolicy::Destroy,
    )
    .unwrap();

    let group = group_ops::create_group(&conn, "Cards").unwrap();

    let group = group_ops::add_address(&conn, group.id, ann.address_id.unwrap()).unwrap();
    assert_eq!(group.address_ids.len(), 1);

    assert!(group_ops::add_address(&conn, group.id, bob.address_id.unwrap()).is_err());
}

#[test]
fn destroying_an_address_clears_its_group_memberships() {
    let conn = setup();
    let ann = add_with_address(&conn, "Ann", "Smith", "123 Main St");
    let address_id = ann.address_id.unwrap();

    let group = group_ops::create_group(&conn, "Cards").unwrap();
    group_ops::add_address(&conn, group.id, address_id).unwrap();

    contact_ops::delete_contact(&conn, ann.id, OrphanPolicy::Destroy).unwrap();

    let group = group_repo::find_by_id(&conn, group.id).unwrap().unwrap();
    assert!(group.address_ids.is_empty());
}
