use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::ids::Id;
use crate::validation::ValidationErrors;

/// A person in the address book. References at most one address at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id<Contact>,
    pub prefix: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub birthday: Option<NaiveDate>,
    pub work_phone: Option<String>,
    pub cell_phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address_id: Option<Id<Address>>,
}

impl Contact {
    pub fn create(first_name: String, last_name: String) -> Self {
        Self {
            id: Id::generate(),
            prefix: None,
            first_name,
            middle_name: None,
            last_name,
            birthday: None,
            work_phone: None,
            cell_phone: None,
            email: None,
            website: None,
            address_id: None,
        }
    }

    pub fn full_name(&self) -> String {
        let mut name = String::new();
        if let Some(prefix) = &self.prefix {
            name.push_str(prefix);
            name.push(' ');
        }
        name.push_str(&self.first_name);
        if let Some(middle) = &self.middle_name {
            name.push(' ');
            name.push_str(middle);
        }
        name.push(' ');
        name.push_str(&self.last_name);
        name
    }

    /// "Last, First" for sorted listings.
    pub fn list_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.last_name.trim().is_empty() {
            errors.add("last_name", "cannot be blank");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_includes_optional_parts() {
        let mut contact = Contact::create("Ann".into(), "Smith".into());
        assert_eq!(contact.full_name(), "Ann Smith");

        contact.prefix = Some("Dr.".into());
        contact.middle_name = Some("Q".into());
        assert_eq!(contact.full_name(), "Dr. Ann Q Smith");
    }

    #[test]
    fn list_name_is_last_comma_first() {
        let contact = Contact::create("Ann".into(), "Smith".into());
        assert_eq!(contact.list_name(), "Smith, Ann");
    }

    #[test]
    fn validate_requires_last_name() {
        let contact = Contact::create("Ann".into(), "  ".into());
        let errors = contact.validate();
        assert_eq!(errors.on_field("last_name"), vec!["cannot be blank"]);
    }
}
