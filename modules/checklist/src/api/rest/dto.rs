//! Wire representations for the checklist endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::model::{Item, ItemPatch, ItemQuery, NewItem, Page};

/// Listing parameters as they arrive on the query string. Everything is
/// optional text; normalization happens in the domain.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

impl From<ListParams> for ItemQuery {
    fn from(params: ListParams) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            category: params.category,
            search: params.search,
            sort_field: params.sort_field,
            sort_direction: params.sort_direction,
        }
    }
}

/// Body for `POST /api/checklist`. Only the title is mandatory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl From<CreateItemRequest> for NewItem {
    fn from(request: CreateItemRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            due_date: request.due_date,
            priority: request.priority,
        }
    }
}

/// Body for `PATCH /api/checklist/{id}`. An omitted field stays
/// untouched; an explicit `null` clears the nullable ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option_rfc3339")]
    pub due_date: Option<Option<OffsetDateTime>>,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl From<UpdateItemRequest> for ItemPatch {
    fn from(request: UpdateItemRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            completed: request.completed,
            due_date: request.due_date,
            priority: request.priority,
        }
    }
}

/// Present (including `null`) deserializes to `Some(..)`; absent fields
/// fall back to the outer `None` through `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn double_option_rfc3339<'de, D>(
    deserializer: D,
) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    time::serde::rfc3339::option::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub priority: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            owner_id: item.owner_id,
            title: item.title,
            description: item.description,
            category: item.category,
            completed: item.completed,
            due_date: item.due_date,
            priority: item.priority,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Response for `GET /api/checklist`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub items: Vec<ItemDto>,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl From<Page<Item>> for PageResponse {
    fn from(page: Page<Item>) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total_count: page.total_count,
            current_page: page.current_page,
            total_pages: page.total_pages,
        }
    }
}

/// Response for `DELETE /api/checklist/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
