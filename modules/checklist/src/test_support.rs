#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures: an in-memory store, seeded accounts and a stub
//! credential verifier.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use identity::domain::verifier::codes;
use identity::infra::storage::SeaOrmAccountsRepository;
use identity::{
    Account, AccountRepository, ExternalIdentity, IdentityGateway, TokenVerifier,
    VerificationError,
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::model::{DEFAULT_PRIORITY, Item};
use crate::domain::repo::ItemRepository;
use crate::domain::service::ChecklistService;
use crate::infra::storage::SeaOrmItemsRepository;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
/// Verifies fine but has no account row.
pub const DRIFTER_TOKEN: &str = "drifter-token";

pub const ACCOUNTS_DDL: &str = "
CREATE TABLE accounts (
    id BLOB PRIMARY KEY,
    external_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

pub const ITEMS_DDL: &str = "
CREATE TABLE checklist_items (
    id BLOB PRIMARY KEY,
    owner_id BLOB NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    category TEXT,
    completed INTEGER NOT NULL,
    due_date TEXT,
    priority INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Credential verifier backed by a fixed token table. Route tests care
/// about binding and ownership, not signatures.
#[derive(Default)]
pub struct StubVerifier {
    identities: HashMap<String, ExternalIdentity>,
}

impl StubVerifier {
    #[must_use]
    pub fn with(mut self, token: &str, external_id: &str, email: &str) -> Self {
        self.identities.insert(
            token.to_owned(),
            ExternalIdentity {
                external_id: external_id.to_owned(),
                email: Some(email.to_owned()),
                display_name: None,
            },
        );
        self
    }
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, credential: &str) -> Result<ExternalIdentity, VerificationError> {
        self.identities
            .get(credential)
            .cloned()
            .ok_or_else(|| VerificationError::new(codes::INVALID, "unknown test token"))
    }
}

/// In-memory sqlite with the accounts and items tables created.
///
/// A single connection keeps every statement on the same `:memory:`
/// database.
pub async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("connect in-memory sqlite");
    db.execute_unprepared(ACCOUNTS_DDL)
        .await
        .expect("create accounts table");
    db.execute_unprepared(ITEMS_DDL)
        .await
        .expect("create items table");
    db
}

pub async fn seed_account(db: &DatabaseConnection, external_id: &str, email: &str) -> Account {
    let account = Account {
        id: Uuid::now_v7(),
        external_id: external_id.to_owned(),
        email: email.to_owned(),
        display_name: "Seeded Account".to_owned(),
        created_at: OffsetDateTime::now_utc(),
    };
    SeaOrmAccountsRepository::new(db.clone())
        .insert(&account)
        .await
        .expect("seed account");
    account
}

#[must_use]
pub fn item(owner_id: Uuid, title: &str) -> Item {
    let now = OffsetDateTime::now_utc();
    Item {
        id: Uuid::now_v7(),
        owner_id,
        title: title.to_owned(),
        description: None,
        category: None,
        completed: false,
        due_date: None,
        priority: DEFAULT_PRIORITY,
        created_at: now,
        updated_at: now,
    }
}

pub async fn insert_item(db: &DatabaseConnection, item: &Item) {
    SeaOrmItemsRepository::new(db.clone())
        .insert(item)
        .await
        .expect("insert item");
}

pub struct TestEnv {
    pub router: Router,
    pub db: DatabaseConnection,
    pub alice: Account,
    pub bob: Account,
}

/// Full checklist router over seeded alice and bob accounts.
pub async fn test_env() -> TestEnv {
    let db = inmem_db().await;
    let alice = seed_account(&db, "firebase-alice", "alice@example.com").await;
    let bob = seed_account(&db, "firebase-bob", "bob@example.com").await;

    let verifier = StubVerifier::default()
        .with(ALICE_TOKEN, "firebase-alice", "alice@example.com")
        .with(BOB_TOKEN, "firebase-bob", "bob@example.com")
        .with(DRIFTER_TOKEN, "firebase-drifter", "drifter@example.com");
    let gateway = Arc::new(IdentityGateway::new(
        Arc::new(verifier),
        Arc::new(SeaOrmAccountsRepository::new(db.clone())),
    ));
    let service = Arc::new(ChecklistService::new(Arc::new(SeaOrmItemsRepository::new(
        db.clone(),
    ))));

    TestEnv {
        router: crate::api::rest::routes::router(service, gateway),
        db,
        alice,
        bob,
    }
}
