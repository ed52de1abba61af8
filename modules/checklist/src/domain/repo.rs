//! Item persistence seam.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;
use super::model::{Item, ItemPatch, Sort};

/// Filter shared by `count` and `list`. The owner id is mandatory by
/// construction; category and search are optional extra predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    pub owner_id: Uuid,
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

/// Item store. Every scoped operation takes the owner id and builds the
/// `id AND owner_id` conjunction itself, so cross-account reads and
/// writes are unrepresentable at this seam.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Number of items matching the filter, pagination ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the query fails.
    async fn count(&self, filter: &ItemFilter) -> Result<u64, DomainError>;

    /// One window of items matching the filter, ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the query fails.
    async fn list(
        &self,
        filter: &ItemFilter,
        sort: Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Item>, DomainError>;

    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the insert fails.
    async fn insert(&self, item: &Item) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the query fails.
    async fn find_scoped(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Item>, DomainError>;

    /// Apply the patch and stamp `updated_at`. Returns whether a row
    /// matched the conjunction.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the write fails.
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &ItemPatch,
        updated_at: OffsetDateTime,
    ) -> Result<bool, DomainError>;

    /// Returns whether a row matched the conjunction.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the delete fails.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, DomainError>;
}
