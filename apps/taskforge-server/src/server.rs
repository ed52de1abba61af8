//! Router assembly and the serve loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::routing::get;
use axum::{Json, Router};
use checklist::ChecklistService;
use checklist::infra::storage::SeaOrmItemsRepository;
use http::HeaderValue;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use identity::IdentityGateway;
use identity::infra::jwks::JwksVerifier;
use identity::infra::storage::SeaOrmAccountsRepository;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect, assemble and serve until an interrupt or terminate signal.
///
/// # Errors
///
/// Fails when the database is unreachable, the verifier configuration is
/// invalid, or the listen address cannot be bound.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = connect(&config).await?;
    let app = router(&config, db)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")
}

async fn connect(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database.url.clone());
    opts.max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds));
    Database::connect(opts)
        .await
        .context("connecting to the database")
}

/// The full API surface over an established connection.
///
/// # Errors
///
/// Fails when the verifier configuration or a CORS origin is invalid.
pub fn router(config: &AppConfig, db: DatabaseConnection) -> anyhow::Result<Router> {
    let verifier =
        JwksVerifier::from_config(&config.auth).context("building the token verifier")?;
    let gateway = Arc::new(IdentityGateway::new(
        Arc::new(verifier),
        Arc::new(SeaOrmAccountsRepository::new(db.clone())),
    ));
    let service = Arc::new(ChecklistService::new(Arc::new(SeaOrmItemsRepository::new(
        db,
    ))));

    let api = Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", identity::api::rest::routes::router(gateway.clone()))
        .nest(
            "/api/checklist",
            checklist::api::rest::routes::router(service, gateway),
        );

    Ok(api
        .layer(cors(config)?)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http()))
}

/// `GET /api/health` — process liveness. Public.
async fn health() -> Json<Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp,
    }))
}

fn cors(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let cors = &config.server.cors;
    let mut layer = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if let Some(seconds) = cors.max_age_seconds {
        layer = layer.max_age(Duration::from_secs(seconds));
    }

    if cors.allowed_origins.is_empty() {
        anyhow::ensure!(
            !cors.allow_credentials,
            "CORS credentials require an explicit origin allow-list"
        );
        return Ok(layer.allow_origin(Any));
    }

    let origins = cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    layer = layer.allow_origin(AllowOrigin::list(origins));
    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }
    Ok(layer)
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install the interrupt handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install the terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
