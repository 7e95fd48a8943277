use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AbookError {
    /// One or more field/record-level validation failures. The save is
    /// blocked; the errors are structured data for the caller to display.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type AbookResult<T> = Result<T, AbookError>;

impl AbookError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        AbookError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// The validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AbookError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
