//! Domain models for identity resolution.

use time::OffsetDateTime;
use uuid::Uuid;

/// The identity asserted by a verified credential.
///
/// `external_id` is the provider's stable subject identifier; email and
/// display name are optional claims and may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub external_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// A persisted account bound to exactly one external identity.
///
/// `id` and `external_id` are immutable after creation. At most one
/// account exists per external identity; accounts are never deleted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: OffsetDateTime,
}

/// How far resolution must go for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountBinding {
    /// Verify the credential only; no account lookup. Used by the
    /// provisioning endpoint, which must accept identities that do not
    /// have an account yet.
    ClaimOnly,
    /// Verify the credential and require a bound account.
    Required,
}

/// Request-scoped authentication result.
///
/// Constructed fresh for every request by the auth layer; never shared
/// across requests. `account` is `None` under [`AccountBinding::ClaimOnly`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: ExternalIdentity,
    pub account: Option<Account>,
}

/// Outcome of account provisioning. `created` distinguishes first contact
/// from an idempotent re-sync.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub account: Account,
    pub created: bool,
}
