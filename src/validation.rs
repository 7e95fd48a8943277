use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AbookError, AbookResult};

/// A single validation failure. `field: None` marks a record-level ("base")
/// error rather than a complaint about one specific field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
}

/// Collected validation failures for one entity. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    entries: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.entries.push(ValidationError {
            field: Some(field.to_string()),
            message: message.to_string(),
        });
    }

    pub fn add_base(&mut self, message: &str) {
        self.entries.push(ValidationError {
            field: None,
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.entries.iter()
    }

    /// Messages attached to a specific field.
    pub fn on_field(&self, field: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.field.as_deref() == Some(field))
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Record-level messages.
    pub fn on_base(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Convert into an error if any failure was recorded.
    pub fn into_result(self) -> AbookResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AbookError::Invalid(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .entries
            .iter()
            .map(|e| match &e.field {
                Some(field) => format!("{} {}", field, e.message),
                None => e.message.clone(),
            })
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// US state and territory postal codes accepted in the `state` field.
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID",
    "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS",
    "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK",
    "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", "DC", "AS", "GU", "MP", "PR", "VI",
];

pub fn valid_state_code(code: &str) -> bool {
    STATE_CODES.contains(&code)
}

/// `#####` or `#####-####`.
pub fn valid_zip(zip: &str) -> bool {
    let bytes = zip.as_bytes();
    match bytes.len() {
        5 => bytes.iter().all(|b| b.is_ascii_digit()),
        10 => {
            bytes[..5].iter().all(|b| b.is_ascii_digit())
                && bytes[5] == b'-'
                && bytes[6..].iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> AbookResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(AbookError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
