//! Pix Access - PIX payment processing and access entitlement backend.
//!
//! Issues PIX payment requests through Mercado Pago, reconciles asynchronous
//! payment-status webhooks with local records, and grants time-boxed access
//! entitlements upon approved payment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
