//! Error taxonomy for identity resolution.
//!
//! Every failure is a value; nothing in this module panics or unwinds
//! past the gateway.

use thiserror::Error;

/// A verifier rejection, tagged with the provider's failure code.
///
/// The gateway classifies codes into [`AuthError`] buckets; codes it does
/// not recognize land in [`AuthError::UnknownVerification`].
#[derive(Debug, Error)]
#[error("credential verification failed ({code}): {detail}")]
pub struct VerificationError {
    pub code: String,
    pub detail: String,
}

impl VerificationError {
    #[must_use]
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}

/// Identity resolution failures, as seen by callers of
/// [`IdentityGateway::resolve`](super::gateway::IdentityGateway::resolve).
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential was presented (absent header or empty token).
    #[error("no credential presented")]
    MissingCredential,

    /// The credential is structurally invalid.
    #[error("malformed credential: {detail}")]
    MalformedCredential { detail: String },

    /// The credential's validity window has passed.
    #[error("expired credential")]
    ExpiredCredential,

    /// The credential's signing key is no longer published.
    #[error("revoked credential")]
    RevokedCredential,

    /// Verification failed for a reason outside the known taxonomy.
    #[error("credential rejected ({code}): {detail}")]
    UnknownVerification { code: String, detail: String },

    /// The identity verified but no account is bound to it. Distinct and
    /// user-actionable: the client should complete provisioning.
    #[error("no account provisioned for external identity {external_id}")]
    AccountNotProvisioned {
        external_id: String,
        email: Option<String>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Account provisioning failures.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Neither the request nor the credential's claims carry an email.
    #[error("an email address is required to provision an account")]
    EmailRequired,

    /// A uniqueness conflict was detected but the conflicting row could
    /// not be re-read. Fatal for this request; never retried here.
    #[error("provisioning race left no account for {external_id}")]
    RaceUnresolved { external_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Account store failures. `Conflict` is load-bearing: the gateway's race
/// recovery triggers on it and only on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("uniqueness conflict: {message}")]
    Conflict { message: String },

    #[error("database error: {message}")]
    Database { message: String },
}

impl StoreError {
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
