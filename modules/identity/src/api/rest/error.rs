use http::StatusCode;
use taskforge_http::Problem;

use crate::domain::error::{AuthError, ProvisionError};

/// Stable `code` members clients branch on.
pub mod codes {
    pub const NO_TOKEN: &str = "NO_TOKEN";
    pub const INVALID_TOKEN_FORMAT: &str = "INVALID_TOKEN_FORMAT";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const USER_NOT_SYNCED: &str = "USER_NOT_SYNCED";
    pub const EMAIL_REQUIRED: &str = "EMAIL_REQUIRED";
    pub const SYNC_RACE_UNRESOLVED: &str = "SYNC_RACE_UNRESOLVED";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Map a resolution failure to an RFC 9457 problem.
///
/// All verification failures are 401; a missing account under a required
/// binding is 404 and carries the external id (and claim email when
/// present) so the client can drive provisioning.
#[must_use]
pub fn auth_error_to_problem(e: &AuthError) -> Problem {
    match e {
        AuthError::MissingCredential => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "No token provided")
                .with_code(codes::NO_TOKEN)
        }
        AuthError::MalformedCredential { .. } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Invalid token format")
                .with_code(codes::INVALID_TOKEN_FORMAT)
        }
        AuthError::ExpiredCredential => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Token expired")
                .with_code(codes::TOKEN_EXPIRED)
        }
        AuthError::RevokedCredential => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Token revoked")
                .with_code(codes::TOKEN_REVOKED)
        }
        AuthError::UnknownVerification { .. } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Invalid token")
                .with_code(codes::INVALID_TOKEN)
        }
        AuthError::AccountNotProvisioned { external_id, email } => {
            let mut problem = Problem::new(
                StatusCode::NOT_FOUND,
                "Not Found",
                "User not found in database. Please complete registration.",
            )
            .with_code(codes::USER_NOT_SYNCED)
            .with_extension("externalId", external_id);
            if let Some(email) = email {
                problem = problem.with_extension("email", email);
            }
            problem
        }
        AuthError::Store(err) => {
            tracing::error!(error = %err, "account lookup failed");
            internal()
        }
    }
}

#[must_use]
pub fn provision_error_to_problem(e: &ProvisionError) -> Problem {
    match e {
        ProvisionError::EmailRequired => {
            Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "Email is required")
                .with_code(codes::EMAIL_REQUIRED)
        }
        ProvisionError::RaceUnresolved { external_id } => {
            tracing::error!(%external_id, "provisioning conflict left no surviving row");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Failed to sync user",
            )
            .with_code(codes::SYNC_RACE_UNRESOLVED)
        }
        ProvisionError::Store(err) => {
            tracing::error!(error = %err, "account provisioning failed");
            internal()
        }
    }
}

fn internal() -> Problem {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "An internal error occurred",
    )
    .with_code(codes::INTERNAL)
}

impl From<AuthError> for Problem {
    fn from(e: AuthError) -> Self {
        auth_error_to_problem(&e)
    }
}

impl From<ProvisionError> for Problem {
    fn from(e: ProvisionError) -> Self {
        provision_error_to_problem(&e)
    }
}
