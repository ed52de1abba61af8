pub mod error;
pub mod gateway;
pub mod model;
pub mod repo;
pub mod verifier;
