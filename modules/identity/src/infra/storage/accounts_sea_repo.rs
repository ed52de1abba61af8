use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};
use uuid::Uuid;

use crate::domain::error::StoreError;
use crate::domain::model::Account;
use crate::domain::repo::AccountRepository;
use crate::infra::storage::entity::account::{
    ActiveModel as AccountAM, Column, Entity as AccountEntity, Model as AccountRow,
};

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            external_id: row.external_id,
            email: row.email,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

/// ORM-based implementation of the [`AccountRepository`] trait.
#[derive(Clone)]
pub struct SeaOrmAccountsRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountsRepository {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Account>, StoreError> {
        let found = AccountEntity::find()
            .filter(Condition::all().add(Expr::col(Column::ExternalId).eq(external_id)))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let found = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let m = AccountAM {
            id: Set(account.id),
            external_id: Set(account.external_id.clone()),
            email: Set(account.email.clone()),
            display_name: Set(account.display_name.clone()),
            created_at: Set(account.created_at),
        };
        AccountEntity::insert(m)
            .exec(&self.db)
            .await
            .map_err(insert_err)?;
        Ok(())
    }
}

/// Unique violations surface as [`StoreError::Conflict`]; provisioning
/// reads them as losing a first-contact race.
fn insert_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => StoreError::conflict(message),
        _ => db_err(err),
    }
}

fn db_err(err: DbErr) -> StoreError {
    StoreError::database(err.to_string())
}
