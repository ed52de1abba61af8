use http::StatusCode;
use taskforge_http::Problem;

use crate::domain::error::DomainError;

/// Stable `code` members clients branch on.
pub mod codes {
    pub const ITEM_NOT_FOUND: &str = "ITEM_NOT_FOUND";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Map a checklist failure to an RFC 9457 problem. A row owned by
/// someone else reports the same 404 as a missing one.
#[must_use]
pub fn domain_error_to_problem(e: &DomainError) -> Problem {
    match e {
        DomainError::ItemNotFound { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Not Found", "Item not found")
                .with_code(codes::ITEM_NOT_FOUND)
        }
        DomainError::Database { message } => {
            tracing::error!(error = %message, "checklist store failed");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
            .with_code(codes::INTERNAL)
        }
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e)
    }
}
