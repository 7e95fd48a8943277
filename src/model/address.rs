use serde::{Deserialize, Serialize};

use super::address_type::AddressTypeKind;
use super::contact::Contact;
use super::ids::Id;
use super::phone;
use crate::validation::{self, ValidationErrors};

/// A postal address, shared by zero or more contacts. Up to two of the
/// linked contacts are designated primary/secondary; the designations are
/// re-derived whenever the linked set changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Id<Address>,
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

impl Address {
    pub fn create() -> Self {
        Self {
            id: Id::generate(),
            address1: String::new(),
            address2: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            home_phone: String::new(),
            address_type: None,
            primary_contact_id: None,
            secondary_contact_id: None,
        }
    }

    /// Structural comparison across postal fields and (sanitized) phone.
    /// A missing `other` always counts as different.
    pub fn different_from(&self, other: Option<&Address>) -> bool {
        match other {
            None => true,
            Some(other) => {
                self.address1 != other.address1
                    || self.address2 != other.address2
                    || self.city != other.city
                    || self.state != other.state
                    || self.zip != other.zip
                    || phone::sanitize(&self.home_phone) != phone::sanitize(&other.home_phone)
            }
        }
    }

    pub fn mailing_address(&self) -> String {
        let mut line = self.address1.clone();
        if !self.address2.is_empty() {
            line.push_str(&format!(", {}", self.address2));
        }
        line.push_str(&format!(", {}, {} {}", self.city, self.state, self.zip));
        line
    }

    /// Addressee line for mailing labels.
    pub fn addressee(&self, primary: Option<&Contact>, secondary: Option<&Contact>) -> String {
        if primary.is_none() && secondary.is_none() {
            self.format_without_contacts()
        } else {
            self.type_or_default().format_for_label(primary, secondary)
        }
    }

    /// Addressee line for on-screen display.
    pub fn addressee_for_display(
        &self,
        primary: Option<&Contact>,
        secondary: Option<&Contact>,
    ) -> String {
        if primary.is_none() && secondary.is_none() {
            self.format_without_contacts()
        } else {
            self.type_or_default().format_for_display(primary, secondary)
        }
    }

    pub fn is_street_address_empty(&self) -> bool {
        self.address1.is_empty()
            || self.city.is_empty()
            || self.state.is_empty()
            || self.zip.is_empty()
    }

    /// No usable data at all: neither a full street address nor a phone.
    pub fn is_empty(&self) -> bool {
        self.is_street_address_empty() && self.home_phone.is_empty()
    }

    /// Copy every field except identity from `other`. Used when an edit is
    /// applied in place to an existing row.
    pub fn assign_fields_from(&mut self, other: &Address) {
        self.assign_postal_fields_from(other);
        self.address_type = other.address_type;
        self.primary_contact_id = other.primary_contact_id;
        self.secondary_contact_id = other.secondary_contact_id;
    }

    /// Copy only the postal fields and phone from `other`.
    pub fn assign_postal_fields_from(&mut self, other: &Address) {
        self.address1 = other.address1.clone();
        self.address2 = other.address2.clone();
        self.city = other.city.clone();
        self.state = other.state.clone();
        self.zip = other.zip.clone();
        self.home_phone = other.home_phone.clone();
    }

    /// Pre-save normalization: the phone is stored sanitized, and an
    /// individual-type address keeps no secondary designation.
    pub fn normalize(&mut self) {
        self.home_phone = phone::sanitize(&self.home_phone);
        if let Some(kind) = self.address_type {
            if kind.only_one_main_contact() {
                self.secondary_contact_id = None;
            }
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !self.state.is_empty() && !validation::valid_state_code(&self.state) {
            errors.add("state", "is not a valid state code");
        }
        if !self.zip.is_empty() && !validation::valid_zip(&self.zip) {
            errors.add("zip", "is not valid");
        }
        if !self.home_phone.is_empty() && !phone::is_valid(&self.home_phone) {
            errors.add("home_phone", "is not valid");
        }

        if self.home_phone.is_empty() && self.is_street_address_empty() {
            errors.add_base("You must specify a phone number or a full address");
        }

        let any_street_part =
            !self.address1.is_empty() || !self.city.is_empty() || !self.zip.is_empty();
        let missing_street_part =
            self.address1.is_empty() || self.city.is_empty() || self.zip.is_empty();
        if any_street_part && missing_street_part {
            errors.add_base("You must specify a valid address");
        }

        if self.secondary_contact_id.is_none()
            && self
                .address_type
                .is_some_and(|kind| !kind.only_one_main_contact())
        {
            errors.add_base("This address type requires primary and secondary contacts be specified");
        }

        errors
    }

    fn type_or_default(&self) -> AddressTypeKind {
        self.address_type.unwrap_or(AddressTypeKind::Individual)
    }

    fn format_without_contacts(&self) -> String {
        if !self.address1.is_empty() {
            let mut line = self.address1.clone();
            if !self.address2.is_empty() {
                line.push_str(&format!(" {}", self.address2));
            }
            line.push_str(&format!(", {}, {} {}", self.city, self.state, self.zip));
            line
        } else {
            self.home_phone.clone()
        }
    }
}
