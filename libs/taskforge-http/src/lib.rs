//! Shared HTTP plumbing for Taskforge modules.
//!
//! Keeps the REST layers of the modules free of boilerplate:
//! - [`problem::Problem`] — RFC 9457 `application/problem+json` responses
//!   with a stable machine-readable `code` extension,
//! - [`auth_header`] — bearer-credential extraction from request headers.

pub mod auth_header;
pub mod problem;

pub use problem::{ApiResult, Problem};
