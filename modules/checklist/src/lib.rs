//! Checklist Module
//!
//! Owner-scoped checklist items with a paginated, filtered, sorted
//! listing over untrusted query parameters.
//!
//! ## Architecture
//!
//! This module follows strict layering:
//!
//! ### API Layer (`checklist::api`)
//! - `routes.rs` - Route definitions, all behind a required account binding
//! - `handlers.rs` - Request handlers (list, create, update, delete)
//! - `dto.rs` - REST DTOs, camelCase on the wire
//! - `error.rs` - HTTP error mapping (domain errors → RFC 9457 Problem)
//!
//! ### Domain Layer (`checklist::domain`)
//! - `service.rs` - [`ChecklistService`]: query normalization and CRUD
//! - `model.rs` - Items, patches, and the query types. Normalization of
//!   raw listing parameters is total; malformed input falls back to
//!   defaults instead of erroring
//! - `repo.rs` - [`ItemRepository`] trait; every scoped operation takes
//!   the owner id so cross-account access is unrepresentable
//!
//! ### Infrastructure Layer (`checklist::infra`)
//! - `storage/` - `SeaORM` entity and repository implementation
//!
//! Ownership is enforced by predicate conjunction (`id AND owner_id`) on
//! every mutation; a row owned by someone else is indistinguishable from
//! a missing one.

pub mod api;
pub mod domain;
pub mod infra;

pub use domain::error::DomainError;
pub use domain::model::{
    Item, ItemPatch, ItemQuery, ListQuery, NewItem, Page, Sort, SortDirection, SortField,
};
pub use domain::repo::{ItemFilter, ItemRepository};
pub use domain::service::ChecklistService;

#[cfg(test)]
mod test_support;
