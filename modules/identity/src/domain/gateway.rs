//! Identity resolution and account provisioning.

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use super::error::{AuthError, ProvisionError, StoreError, VerificationError};
use super::model::{Account, AccountBinding, AuthContext, ExternalIdentity, Provisioned};
use super::repo::AccountRepository;
use super::verifier::{TokenVerifier, codes};

/// Single entry point for authenticating requests and binding identities
/// to accounts.
///
/// Built once at bootstrap around a process-scoped verifier and account
/// store, then shared across requests. Holds no per-request state.
pub struct IdentityGateway {
    verifier: Arc<dyn TokenVerifier>,
    accounts: Arc<dyn AccountRepository>,
}

impl IdentityGateway {
    #[must_use]
    pub fn new(verifier: Arc<dyn TokenVerifier>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { verifier, accounts }
    }

    /// Resolve a bearer credential into an [`AuthContext`].
    ///
    /// Under [`AccountBinding::ClaimOnly`] the account store is not
    /// consulted at all. Under [`AccountBinding::Required`] a verified
    /// identity without an account fails with
    /// [`AuthError::AccountNotProvisioned`], carrying the external id and
    /// claim email so the caller can complete provisioning.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] bucket for every non-success outcome; this
    /// method never panics on untrusted input.
    #[tracing::instrument(skip(self, credential), fields(binding = ?binding))]
    pub async fn resolve(
        &self,
        credential: Option<&str>,
        binding: AccountBinding,
    ) -> Result<AuthContext, AuthError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let identity = match self.verifier.verify(token).await {
            Ok(identity) => identity,
            Err(err) => {
                // Never log the credential itself.
                tracing::warn!(code = %err.code, detail = %err.detail, "credential rejected");
                return Err(classify(err));
            }
        };

        match binding {
            AccountBinding::ClaimOnly => Ok(AuthContext {
                identity,
                account: None,
            }),
            AccountBinding::Required => {
                let account = self
                    .accounts
                    .find_by_external_id(&identity.external_id)
                    .await?;
                match account {
                    Some(account) => Ok(AuthContext {
                        identity,
                        account: Some(account),
                    }),
                    None => {
                        tracing::warn!(
                            external_id = %identity.external_id,
                            "verified identity has no provisioned account"
                        );
                        Err(AuthError::AccountNotProvisioned {
                            external_id: identity.external_id,
                            email: identity.email,
                        })
                    }
                }
            }
        }
    }

    /// Provision an account for a verified identity.
    ///
    /// Idempotent: an existing account is returned with `created = false`.
    /// Concurrent first contact is serialized by the store's unique
    /// constraint on the external id; on a conflict the surviving row is
    /// re-read and returned. There is deliberately no application-level
    /// lock around this.
    ///
    /// # Errors
    ///
    /// [`ProvisionError::EmailRequired`] when neither the request nor the
    /// claims carry an email; [`ProvisionError::RaceUnresolved`] when a
    /// conflict fires but no row can be re-read.
    #[tracing::instrument(skip_all, fields(external_id = %identity.external_id))]
    pub async fn provision(
        &self,
        identity: &ExternalIdentity,
        requested_email: Option<String>,
        requested_name: Option<String>,
    ) -> Result<Provisioned, ProvisionError> {
        let email = non_blank(requested_email)
            .or_else(|| non_blank(identity.email.clone()))
            .ok_or(ProvisionError::EmailRequired)?;

        let display_name = non_blank(requested_name)
            .or_else(|| non_blank(identity.display_name.clone()))
            .or_else(|| local_part(&email))
            .unwrap_or_else(|| "User".to_owned());

        if let Some(existing) = self
            .accounts
            .find_by_external_id(&identity.external_id)
            .await?
        {
            return Ok(Provisioned {
                account: existing,
                created: false,
            });
        }

        let account = Account {
            id: Uuid::now_v7(),
            external_id: identity.external_id.clone(),
            email,
            display_name,
            created_at: OffsetDateTime::now_utc(),
        };

        match self.accounts.insert(&account).await {
            Ok(()) => {
                tracing::info!(account_id = %account.id, "account provisioned");
                Ok(Provisioned {
                    account,
                    created: true,
                })
            }
            Err(StoreError::Conflict { .. }) => {
                // Lost a first-contact race; the surviving row wins.
                let survivor = self
                    .accounts
                    .find_by_external_id(&identity.external_id)
                    .await?
                    .ok_or_else(|| ProvisionError::RaceUnresolved {
                        external_id: identity.external_id.clone(),
                    })?;
                tracing::info!(account_id = %survivor.id, "provisioning raced, reusing survivor");
                Ok(Provisioned {
                    account: survivor,
                    created: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Map a provider failure code to its response-level bucket.
fn classify(err: VerificationError) -> AuthError {
    match err.code.as_str() {
        codes::EXPIRED => AuthError::ExpiredCredential,
        codes::REVOKED => AuthError::RevokedCredential,
        codes::MALFORMED => AuthError::MalformedCredential { detail: err.detail },
        _ => AuthError::UnknownVerification {
            code: err.code,
            detail: err.detail,
        },
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Everything before the first `@`, or `None` when that is empty.
fn local_part(email: &str) -> Option<String> {
    let part = email.split('@').next().unwrap_or_default();
    (!part.is_empty()).then(|| part.to_owned())
}
