pub mod schema;
pub mod address_repo;
pub mod contact_repo;
pub mod group_repo;
pub mod staged_edit_repo;

use crate::error::{AbookError, AbookResult};
use crate::model::Id;

pub(crate) fn parse_id<T>(s: &str) -> AbookResult<Id<T>> {
    Id::parse(s).map_err(|e| AbookError::Other(format!("Invalid UUID: {}", e)))
}

pub(crate) fn parse_optional_id<T>(s: Option<String>) -> AbookResult<Option<Id<T>>> {
    s.map(|s| parse_id(&s)).transpose()
}
