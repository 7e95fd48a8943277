use serde::{Deserialize, Serialize};

use super::contact::Contact;

/// Classification of an address by how many main contacts it designates:
/// one (`Individual`) or two (`Family`). Governs validation and how the
/// addressee line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressTypeKind {
    Individual,
    Family,
}

/// Addressee rendering functions for one address type. Label formatting is
/// for mailing labels; display formatting is for on-screen lists.
pub struct FormatTable {
    pub label: fn(Option<&Contact>, Option<&Contact>) -> String,
    pub display: fn(Option<&Contact>, Option<&Contact>) -> String,
}

const INDIVIDUAL_FORMATS: FormatTable = FormatTable {
    label: individual_label,
    display: individual_display,
};

const FAMILY_FORMATS: FormatTable = FormatTable {
    label: family_label,
    display: family_display,
};

impl AddressTypeKind {
    pub const ALL: &'static [AddressTypeKind] =
        &[AddressTypeKind::Individual, AddressTypeKind::Family];

    pub fn only_one_main_contact(&self) -> bool {
        matches!(self, AddressTypeKind::Individual)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AddressTypeKind::Individual => "Individual",
            AddressTypeKind::Family => "Family",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(AddressTypeKind::Individual),
            "family" => Some(AddressTypeKind::Family),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AddressTypeKind::Individual => "individual",
            AddressTypeKind::Family => "family",
        }
    }

    pub fn formats(&self) -> &'static FormatTable {
        match self {
            AddressTypeKind::Individual => &INDIVIDUAL_FORMATS,
            AddressTypeKind::Family => &FAMILY_FORMATS,
        }
    }

    pub fn format_for_label(
        &self,
        primary: Option<&Contact>,
        secondary: Option<&Contact>,
    ) -> String {
        (self.formats().label)(primary, secondary)
    }

    pub fn format_for_display(
        &self,
        primary: Option<&Contact>,
        secondary: Option<&Contact>,
    ) -> String {
        (self.formats().display)(primary, secondary)
    }
}

fn individual_label(primary: Option<&Contact>, secondary: Option<&Contact>) -> String {
    match primary.or(secondary) {
        Some(contact) => match &contact.prefix {
            Some(prefix) => format!("{} {} {}", prefix, contact.first_name, contact.last_name),
            None => format!("{} {}", contact.first_name, contact.last_name),
        },
        None => String::new(),
    }
}

fn individual_display(primary: Option<&Contact>, secondary: Option<&Contact>) -> String {
    match primary.or(secondary) {
        Some(contact) => format!("{}, {}", contact.last_name, contact.first_name),
        None => String::new(),
    }
}

fn family_label(primary: Option<&Contact>, secondary: Option<&Contact>) -> String {
    match (primary, secondary) {
        (Some(first), Some(second)) => {
            if first.last_name == second.last_name {
                format!(
                    "{} & {} {}",
                    first.first_name, second.first_name, first.last_name
                )
            } else {
                format!(
                    "{} {} & {} {}",
                    first.first_name, first.last_name, second.first_name, second.last_name
                )
            }
        }
        _ => individual_label(primary, secondary),
    }
}

fn family_display(primary: Option<&Contact>, secondary: Option<&Contact>) -> String {
    match (primary, secondary) {
        (Some(first), Some(second)) => {
            if first.last_name == second.last_name {
                format!(
                    "{}, {} & {}",
                    first.last_name, first.first_name, second.first_name
                )
            } else {
                format!(
                    "{}, {} & {}, {}",
                    first.last_name, first.first_name, second.last_name, second.first_name
                )
            }
        }
        _ => individual_display(primary, secondary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contact;

    fn contact(first: &str, last: &str) -> Contact {
        Contact::create(first.into(), last.into())
    }

    #[test]
    fn individual_label_uses_prefix_when_present() {
        let mut ann = contact("Ann", "Smith");
        ann.prefix = Some("Ms.".into());
        let label = AddressTypeKind::Individual.format_for_label(Some(&ann), None);
        assert_eq!(label, "Ms. Ann Smith");
    }

    #[test]
    fn individual_display_is_last_comma_first() {
        let ann = contact("Ann", "Smith");
        let display = AddressTypeKind::Individual.format_for_display(Some(&ann), None);
        assert_eq!(display, "Smith, Ann");
    }

    #[test]
    fn family_label_merges_shared_last_name() {
        let ann = contact("Ann", "Smith");
        let bob = contact("Bob", "Smith");
        let label = AddressTypeKind::Family.format_for_label(Some(&ann), Some(&bob));
        assert_eq!(label, "Ann & Bob Smith");
    }

    #[test]
    fn family_label_keeps_distinct_last_names() {
        let ann = contact("Ann", "Smith");
        let bob = contact("Bob", "Adams");
        let label = AddressTypeKind::Family.format_for_label(Some(&ann), Some(&bob));
        assert_eq!(label, "Ann Smith & Bob Adams");
    }

    #[test]
    fn family_display_merges_shared_last_name() {
        let ann = contact("Ann", "Smith");
        let bob = contact("Bob", "Smith");
        let display = AddressTypeKind::Family.format_for_display(Some(&ann), Some(&bob));
        assert_eq!(display, "Smith, Ann & Bob");
    }

    #[test]
    fn family_falls_back_to_individual_with_one_contact() {
        let ann = contact("Ann", "Smith");
        let label = AddressTypeKind::Family.format_for_label(Some(&ann), None);
        assert_eq!(label, "Ann Smith");
    }

    #[test]
    fn db_str_roundtrips() {
        for kind in AddressTypeKind::ALL {
            assert_eq!(AddressTypeKind::from_db_str(kind.to_db_str()), Some(*kind));
        }
        assert_eq!(AddressTypeKind::from_db_str("corporate"), None);
    }

    #[test]
    fn individual_allows_only_one_main_contact() {
        assert!(AddressTypeKind::Individual.only_one_main_contact());
        assert!(!AddressTypeKind::Family.only_one_main_contact());
    }
}
