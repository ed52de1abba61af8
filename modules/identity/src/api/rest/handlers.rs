use std::sync::Arc;

use axum::{Extension, Json};
use serde_json::{Value, json};
use taskforge_http::ApiResult;

use crate::api::rest::dto::{MeResponse, SyncRequest, SyncResponse};
use crate::api::rest::middleware::{BoundAccount, Identity};
use crate::domain::gateway::IdentityGateway;

/// `POST /api/auth/sync` — find or create the caller's account.
///
/// Runs under a claim-only binding: the identity is verified but may not
/// have an account yet. The external id always comes from the verified
/// claims, never from the body.
#[tracing::instrument(skip_all, fields(external_id = %identity.0.identity.external_id))]
pub async fn sync(
    Extension(gateway): Extension<Arc<IdentityGateway>>,
    identity: Identity,
    body: Option<Json<SyncRequest>>,
) -> ApiResult<Json<SyncResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let provisioned = gateway
        .provision(&identity.0.identity, request.email, request.display_name)
        .await?;

    Ok(Json(SyncResponse {
        user: provisioned.account.into(),
        created: provisioned.created,
    }))
}

/// `GET /api/auth/me` — the caller's bound account.
pub async fn me(BoundAccount(account): BoundAccount) -> Json<MeResponse> {
    Json(MeResponse {
        user: account.into(),
    })
}

/// `GET /api/auth/health` — liveness of the auth subsystem. Public.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "verifier": "ready",
    }))
}
