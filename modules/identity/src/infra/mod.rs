//! Adapters for external systems: the provider's JWKS endpoint and the
//! relational account store.

pub mod jwks;
pub mod storage;
