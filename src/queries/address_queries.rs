use std::cmp::Ordering;

use rusqlite::Connection;

use crate::db::{address_repo, contact_repo};
use crate::error::AbookResult;
use crate::model::{Address, Contact};

/// An address joined with its designated contacts, ready for listing.
#[derive(Debug, Clone)]
pub struct AddressListing {
    pub address: Address,
    pub primary: Option<Contact>,
    pub secondary: Option<Contact>,
}

impl AddressListing {
    pub fn addressee(&self) -> String {
        self.address
            .addressee(self.primary.as_ref(), self.secondary.as_ref())
    }

    pub fn addressee_for_display(&self) -> String {
        self.address
            .addressee_for_display(self.primary.as_ref(), self.secondary.as_ref())
    }
}

/// Every address with its designated contacts, totally ordered: addresses
/// with a primary contact first, by the primary's (last name, first name);
/// addresses without one sort last.
pub fn find_for_list(conn: &Connection) -> AbookResult<Vec<AddressListing>> {
    let mut listings = Vec::new();
    for address in address_repo::find_all(conn)? {
        let primary = match address.primary_contact_id {
            Some(id) => contact_repo::find_by_id(conn, id)?,
            None => None,
        };
        let secondary = match address.secondary_contact_id {
            Some(id) => contact_repo::find_by_id(conn, id)?,
            None => None,
        };
        listings.push(AddressListing {
            address,
            primary,
            secondary,
        });
    }

    listings.sort_by(compare_by_primary_contact);
    Ok(listings)
}

/// Addresses that can belong to a group: those with a street line.
pub fn eligible_for_group(conn: &Connection) -> AbookResult<Vec<Address>> {
    Ok(address_repo::find_all(conn)?
        .into_iter()
        .filter(|a| !a.address1.is_empty())
        .collect())
}

fn compare_by_primary_contact(a: &AddressListing, b: &AddressListing) -> Ordering {
    match (&a.primary, &b.primary) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x
            .last_name
            .cmp(&y.last_name)
            .then_with(|| x.first_name.cmp(&y.first_name)),
    }
}
