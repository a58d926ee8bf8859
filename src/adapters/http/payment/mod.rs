//! HTTP adapter for the payment API.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::PaymentAppState;
pub use routes::{payment_router, payment_routes, webhook_routes};
