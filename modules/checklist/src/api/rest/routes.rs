use std::sync::Arc;

use axum::routing::{get, patch};
use axum::{Extension, Router};
use identity::{AccountBinding, AuthLayer, IdentityGateway};

use crate::api::rest::handlers;
use crate::domain::service::ChecklistService;

/// Routes mounted under `/api/checklist`. Every route requires a bound
/// account; there is nothing public here.
pub fn router(service: Arc<ChecklistService>, gateway: Arc<IdentityGateway>) -> Router {
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route("/{id}", patch(handlers::update).delete(handlers::delete))
        .layer(AuthLayer::new(gateway, AccountBinding::Required))
        .layer(Extension(service))
}
