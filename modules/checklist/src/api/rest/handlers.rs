use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use identity::BoundAccount;
use taskforge_http::ApiResult;
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateItemRequest, DeleteResponse, ItemDto, ListParams, PageResponse, UpdateItemRequest,
};
use crate::domain::service::ChecklistService;

/// `GET /api/checklist` — one page of the caller's items.
#[tracing::instrument(skip_all, fields(account_id = %account.id))]
pub async fn list(
    Extension(service): Extension<Arc<ChecklistService>>,
    BoundAccount(account): BoundAccount,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse>> {
    let page = service.list(account.id, &params.into()).await?;
    Ok(Json(page.into()))
}

/// `POST /api/checklist` — create an item owned by the caller.
#[tracing::instrument(skip_all, fields(account_id = %account.id))]
pub async fn create(
    Extension(service): Extension<Arc<ChecklistService>>,
    BoundAccount(account): BoundAccount,
    Json(body): Json<CreateItemRequest>,
) -> ApiResult<Json<ItemDto>> {
    let item = service.create(account.id, body.into()).await?;
    Ok(Json(item.into()))
}

/// `PATCH /api/checklist/{id}` — partial update of a caller-owned item.
///
/// An absent body is a legal empty patch; it still refreshes the
/// update stamp.
#[tracing::instrument(skip_all, fields(account_id = %account.id, item_id = %id))]
pub async fn update(
    Extension(service): Extension<Arc<ChecklistService>>,
    BoundAccount(account): BoundAccount,
    Path(id): Path<Uuid>,
    body: Option<Json<UpdateItemRequest>>,
) -> ApiResult<Json<ItemDto>> {
    let patch = body.map(|Json(b)| b).unwrap_or_default();
    let item = service.update(account.id, id, patch.into()).await?;
    Ok(Json(item.into()))
}

/// `DELETE /api/checklist/{id}` — remove a caller-owned item.
#[tracing::instrument(skip_all, fields(account_id = %account.id, item_id = %id))]
pub async fn delete(
    Extension(service): Extension<Arc<ChecklistService>>,
    BoundAccount(account): BoundAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    service.delete(account.id, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
