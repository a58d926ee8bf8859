//! Mercado Pago gateway adapter.

mod client;

pub use client::{MercadoPagoClient, MercadoPagoConfig};
