//! Adapters implementing the ports against real infrastructure.

pub mod auth;
pub mod http;
pub mod mercadopago;
pub mod postgres;
