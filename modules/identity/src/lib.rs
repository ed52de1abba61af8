//! Identity Module
//!
//! Resolves bearer credentials into request-scoped identity, and binds
//! verified identities to persisted accounts.
//!
//! ## Architecture
//!
//! This module follows strict layering:
//!
//! ### API Layer (`identity::api`)
//! - `routes.rs` - Route definitions for the auth endpoints
//! - `handlers.rs` - Request handlers (sync, me)
//! - `middleware.rs` - The auth layer that runs identity resolution per
//!   request and inserts [`AuthContext`] into request extensions, plus
//!   extractors for handlers
//! - `dto.rs` - REST DTOs and serialization
//! - `error.rs` - HTTP error mapping (domain errors → RFC 9457 Problem)
//!
//! ### Domain Layer (`identity::domain`)
//! - `gateway.rs` - [`IdentityGateway`]: the single resolution operation and
//!   account provisioning, with first-contact race recovery
//! - `verifier.rs` - [`TokenVerifier`] trait and provider failure codes
//! - `repo.rs` - [`AccountRepository`] trait
//! - `model.rs` / `error.rs` - Domain types and error taxonomy
//!
//! ### Infrastructure Layer (`identity::infra`)
//! - `jwks.rs` - JWKS-backed [`TokenVerifier`] (static key set or HTTP
//!   endpoint with a TTL cache)
//! - `storage/` - `SeaORM` entity and repository implementation
//!
//! The domain layer never imports the API layer, and all `SeaORM`
//! specifics are contained in `infra`.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use api::rest::middleware::{AuthLayer, BoundAccount, Identity};
pub use domain::error::{AuthError, ProvisionError, StoreError, VerificationError};
pub use domain::gateway::IdentityGateway;
pub use domain::model::{Account, AccountBinding, AuthContext, ExternalIdentity, Provisioned};
pub use domain::repo::AccountRepository;
pub use domain::verifier::TokenVerifier;

#[cfg(test)]
mod test_support;
