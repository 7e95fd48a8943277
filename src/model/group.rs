use serde::{Deserialize, Serialize};

use super::address::Address;
use super::ids::Id;

/// A named collection of addresses (e.g. a mailing list). Membership is
/// many-to-many and unordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Id<Group>,
    pub name: String,
    pub address_ids: Vec<Id<Address>>,
}

impl Group {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            address_ids: Vec::new(),
        }
    }
}
