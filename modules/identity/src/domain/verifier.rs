//! Credential verification seam.

use async_trait::async_trait;

use super::error::VerificationError;
use super::model::ExternalIdentity;

/// Provider failure codes, aligned with the identity provider's taxonomy.
///
/// Verifier implementations report these on [`VerificationError::code`];
/// the gateway maps them to response-level buckets. Unlisted codes pass
/// through and land in the unknown-failure bucket.
pub mod codes {
    /// The credential's validity window has passed.
    pub const EXPIRED: &str = "id-token-expired";
    /// The signing key is no longer published by the provider.
    pub const REVOKED: &str = "id-token-revoked";
    /// The credential is not structurally a token.
    pub const MALFORMED: &str = "id-token-malformed";
    /// Verified structure, rejected content (signature, issuer, audience).
    pub const INVALID: &str = "id-token-invalid";
    /// The provider's key material could not be obtained.
    pub const KEYS_UNAVAILABLE: &str = "jwks-unavailable";
}

/// Verifies a bearer credential and extracts the asserted identity.
///
/// Implementations are process-scoped and immutable after construction;
/// the gateway owns a handle and shares it across requests.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`VerificationError`] carrying the provider failure code
    /// when the credential does not verify.
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity, VerificationError>;
}
