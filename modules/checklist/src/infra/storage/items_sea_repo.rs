use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveValue::Set, Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Item, ItemPatch, Sort, SortDirection, SortField};
use crate::domain::repo::{ItemFilter, ItemRepository};
use crate::infra::storage::entity::item::{
    ActiveModel as ItemAM, Column, Entity as ItemEntity, Model as ItemRow,
};

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            category: row.category,
            completed: row.completed,
            due_date: row.due_date,
            priority: row.priority,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// ORM-based implementation of the [`ItemRepository`] trait.
#[derive(Clone)]
pub struct SeaOrmItemsRepository {
    db: DatabaseConnection,
}

impl SeaOrmItemsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SeaOrmItemsRepository {
    async fn count(&self, filter: &ItemFilter) -> Result<u64, DomainError> {
        ItemEntity::find()
            .filter(scope(filter))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn list(
        &self,
        filter: &ItemFilter,
        sort: Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Item>, DomainError> {
        let rows = ItemEntity::find()
            .filter(scope(filter))
            .order_by(order_column(sort.field), order(sort.direction))
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, item: &Item) -> Result<(), DomainError> {
        let m = ItemAM {
            id: Set(item.id),
            owner_id: Set(item.owner_id),
            title: Set(item.title.clone()),
            description: Set(item.description.clone()),
            category: Set(item.category.clone()),
            completed: Set(item.completed),
            due_date: Set(item.due_date),
            priority: Set(item.priority),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        };
        ItemEntity::insert(m).exec(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_scoped(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Item>, DomainError> {
        let found = ItemEntity::find()
            .filter(owner_conjunction(owner_id, id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &ItemPatch,
        updated_at: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let mut row = ItemAM {
            updated_at: Set(updated_at),
            ..Default::default()
        };
        if let Some(title) = &patch.title {
            row.title = Set(title.clone());
        }
        if let Some(description) = &patch.description {
            row.description = Set(description.clone());
        }
        if let Some(category) = &patch.category {
            row.category = Set(category.clone());
        }
        if let Some(completed) = patch.completed {
            row.completed = Set(completed);
        }
        if let Some(due_date) = patch.due_date {
            row.due_date = Set(due_date);
        }
        if let Some(priority) = patch.priority {
            row.priority = Set(priority);
        }

        let result = ItemEntity::update_many()
            .set(row)
            .filter(owner_conjunction(owner_id, id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = ItemEntity::delete_many()
            .filter(owner_conjunction(owner_id, id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

/// Owner scope plus the optional filter predicates. The search predicate
/// lowers both sides, which stays case-insensitive on any backend.
fn scope(filter: &ItemFilter) -> Condition {
    let mut cond = Condition::all().add(Expr::col(Column::OwnerId).eq(filter.owner_id));
    if let Some(category) = &filter.category {
        cond = cond.add(Expr::col(Column::Category).eq(category.clone()));
    }
    if let Some(search) = &filter.search {
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col(Column::Title)))
                .like(format!("%{}%", search.to_lowercase())),
        );
    }
    cond
}

fn owner_conjunction(owner_id: Uuid, id: Uuid) -> Condition {
    Condition::all()
        .add(Expr::col(Column::Id).eq(id))
        .add(Expr::col(Column::OwnerId).eq(owner_id))
}

fn order_column(field: SortField) -> Column {
    match field {
        SortField::Id => Column::Id,
        SortField::Title => Column::Title,
        SortField::Category => Column::Category,
        SortField::Completed => Column::Completed,
        SortField::DueDate => Column::DueDate,
        SortField::Priority => Column::Priority,
        SortField::CreatedAt => Column::CreatedAt,
        SortField::UpdatedAt => Column::UpdatedAt,
    }
}

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

fn db_err(err: DbErr) -> DomainError {
    DomainError::database(err.to_string())
}
