//! Error taxonomy for the checklist domain.

use thiserror::Error;
use uuid::Uuid;

/// Checklist failures. An item owned by someone else reports the same
/// [`DomainError::ItemNotFound`] as a missing one; existence of foreign
/// rows is never revealed.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("checklist item {id} not found")]
    ItemNotFound { id: Uuid },

    #[error("database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
