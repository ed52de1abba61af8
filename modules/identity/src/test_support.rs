#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures: HS256 test keys, token minting and an in-memory store.

use base64::Engine;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::{AuthConfig, JwkKey, JwksSourceConfig};
use crate::domain::model::Account;
use crate::domain::repo::AccountRepository;
use crate::infra::storage::SeaOrmAccountsRepository;

pub const TEST_ISSUER: &str = "https://issuer.test";
pub const TEST_AUDIENCE: &str = "taskforge-test";
pub const TEST_KID: &str = "test-key";
pub const TEST_SECRET: &str = "taskforge-test-secret";

pub const ACCOUNTS_DDL: &str = "
CREATE TABLE accounts (
    id BLOB PRIMARY KEY,
    external_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

#[must_use]
pub fn hs256_jwk(kid: &str) -> JwkKey {
    JwkKey {
        kid: kid.to_owned(),
        alg: Some("HS256".to_owned()),
        kty: "oct".to_owned(),
        n: None,
        e: None,
        k: Some(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(TEST_SECRET)),
    }
}

#[must_use]
pub fn static_auth_config() -> AuthConfig {
    AuthConfig {
        issuer: TEST_ISSUER.to_owned(),
        audience: vec![TEST_AUDIENCE.to_owned()],
        jwks: JwksSourceConfig::Static {
            keys: vec![hs256_jwk(TEST_KID)],
        },
        algorithms: vec!["HS256".to_owned()],
    }
}

/// Mint a token the static test config accepts.
#[must_use]
pub fn mint_token(sub: &str, email: Option<&str>, name: Option<&str>) -> String {
    mint_token_with(Some(TEST_KID), TEST_ISSUER, TEST_AUDIENCE, sub, email, name, 600)
}

#[must_use]
pub fn mint_token_with(
    kid: Option<&str>,
    issuer: &str,
    audience: &str,
    sub: &str,
    email: Option<&str>,
    name: Option<&str>,
    expires_in_seconds: i64,
) -> String {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let mut claims = json!({
        "sub": sub,
        "iss": issuer,
        "aud": audience,
        "iat": now,
        "exp": now + expires_in_seconds,
    });
    if let Some(email) = email {
        claims["email"] = json!(email);
    }
    if let Some(name) = name {
        claims["name"] = json!(name);
    }

    let header = Header {
        alg: Algorithm::HS256,
        kid: kid.map(str::to_owned),
        ..Header::default()
    };
    jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes()))
        .expect("encode jwt")
}

/// In-memory sqlite with the accounts table created.
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
