//! Account persistence seam.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreError;
use super::model::Account;

/// Account store. The backing table carries unique constraints on
/// `external_id` and `email`; `insert` must surface violations of either
/// as [`StoreError::Conflict`] so the gateway can run race recovery.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the store is unreachable or
    /// the query fails.
    async fn find_by_external_id(&self, external_id: &str)
    -> Result<Option<Account>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the store is unreachable or
    /// the query fails.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a uniqueness violation and
    /// [`StoreError::Database`] for any other failure.
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;
}
