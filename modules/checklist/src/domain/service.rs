//! Checklist domain service.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::error::DomainError;
use super::model::{DEFAULT_PRIORITY, Item, ItemPatch, ItemQuery, ListQuery, NewItem, Page};
use super::repo::{ItemFilter, ItemRepository};

/// Owner-scoped checklist operations.
///
/// Every operation takes the caller's account id from the authenticated
/// context; the service never trusts an owner id arriving in request
/// data.
pub struct ChecklistService {
    items: Arc<dyn ItemRepository>,
}

impl ChecklistService {
    #[must_use]
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }

    /// One page of the caller's items.
    ///
    /// The count and the page fetch are two separate reads with no
    /// snapshot between them; totals may drift under concurrent writes.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when either read fails.
    #[instrument(skip(self, query), fields(owner_id = %owner_id))]
    pub async fn list(
        &self,
        owner_id: Uuid,
        query: &ItemQuery,
    ) -> Result<Page<Item>, DomainError> {
        let normalized = ListQuery::from_raw(query);
        tracing::debug!(
            page = normalized.page,
            limit = normalized.limit,
            sort = ?normalized.sort,
            "listing checklist items"
        );

        let filter = ItemFilter {
            owner_id,
            category: normalized.category.clone(),
            search: normalized.search.clone(),
        };

        let total_count = self.items.count(&filter).await?;
        let items = self
            .items
            .list(
                &filter,
                normalized.sort,
                normalized.offset(),
                normalized.limit,
            )
            .await?;

        Ok(Page {
            items,
            total_count,
            current_page: normalized.page,
            total_pages: total_count.div_ceil(normalized.limit),
        })
    }

    /// Create an item owned by the caller. Missing priority defaults to
    /// [`DEFAULT_PRIORITY`]; both timestamps start equal.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Database`] when the insert fails.
    #[instrument(skip(self, new_item), fields(owner_id = %owner_id))]
    pub async fn create(&self, owner_id: Uuid, new_item: NewItem) -> Result<Item, DomainError> {
        let now = OffsetDateTime::now_utc();
        let item = Item {
            id: Uuid::now_v7(),
            owner_id,
            title: new_item.title,
            description: new_item.description,
            category: new_item.category,
            completed: false,
            due_date: new_item.due_date,
            priority: new_item.priority.unwrap_or(DEFAULT_PRIORITY),
            created_at: now,
            updated_at: now,
        };

        self.items.insert(&item).await?;
        tracing::info!(item_id = %item.id, "checklist item created");
        Ok(item)
    }

    /// Apply a partial update to one of the caller's items.
    ///
    /// `updated_at` is always refreshed, even for an empty patch. A row
    /// owned by someone else reports [`DomainError::ItemNotFound`].
    ///
    /// # Errors
    ///
    /// [`DomainError::ItemNotFound`] when no row matches the caller's
    /// scope; [`DomainError::Database`] when the write fails.
    #[instrument(skip(self, patch), fields(owner_id = %owner_id, item_id = %id))]
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Item, DomainError> {
        let matched = self
            .items
            .update(owner_id, id, &patch, OffsetDateTime::now_utc())
            .await?;
        if !matched {
            return Err(DomainError::ItemNotFound { id });
        }

        // Re-read the stamped row; losing it to a concurrent delete is a
        // plain not-found.
        self.items
            .find_scoped(owner_id, id)
            .await?
            .ok_or(DomainError::ItemNotFound { id })
    }

    /// # Errors
    ///
    /// [`DomainError::ItemNotFound`] when no row matches the caller's
    /// scope; [`DomainError::Database`] when the delete fails.
    #[instrument(skip(self), fields(owner_id = %owner_id, item_id = %id))]
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        if self.items.delete(owner_id, id).await? {
            tracing::info!(item_id = %id, "checklist item deleted");
            Ok(())
        } else {
            Err(DomainError::ItemNotFound { id })
        }
    }
}
