//! HTTP adapters (axum).

pub mod middleware;
pub mod payment;
