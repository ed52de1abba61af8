//! REST surface: auth middleware, extractors, DTOs and routes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
