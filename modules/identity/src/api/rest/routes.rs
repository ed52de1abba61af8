use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::api::rest::middleware::AuthLayer;
use crate::domain::gateway::IdentityGateway;
use crate::domain::model::AccountBinding;

/// Routes mounted under `/api/auth`.
///
/// `sync` runs claim-only so identities without an account can reach it;
/// `me` requires a bound account; `health` is public.
pub fn router(gateway: Arc<IdentityGateway>) -> Router {
    let claim_only = Router::new()
        .route("/sync", post(handlers::sync))
        .layer(AuthLayer::new(gateway.clone(), AccountBinding::ClaimOnly));

    let bound = Router::new()
        .route("/me", get(handlers::me))
        .layer(AuthLayer::new(gateway.clone(), AccountBinding::Required));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(claim_only)
        .merge(bound)
        .layer(Extension(gateway))
}
