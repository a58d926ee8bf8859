//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Gateway Ports
//!
//! - `PaymentGateway` - Mercado Pago payment creation and lookup
//!
//! ## Persistence Ports
//!
//! - `PaymentRepository` - Upsert-by-external-id payment record store
//! - `PaymentUserMapRepository` - Payment-to-payer-email association
//! - `EntitlementRepository` - Access grants with uniqueness per payment
//! - `UserDirectory` - Read-only user account lookup
//!
//! ## Auth Ports
//!
//! - `TokenVerifier` - Bearer token validation

mod entitlement_repository;
mod payment_gateway;
mod payment_repository;
mod payment_user_map;
mod token_verifier;
mod user_directory;

pub use entitlement_repository::{EntitlementRepository, GrantOutcome};
pub use payment_gateway::{
    CreatePaymentRequest, GatewayError, GatewayPayer, GatewayPayment, PaymentGateway,
    PixTransactionData, PointOfInteraction,
};
pub use payment_repository::{PaymentFilter, PaymentRepository};
pub use payment_user_map::{PaymentUserMap, PaymentUserMapRepository};
pub use token_verifier::TokenVerifier;
pub use user_directory::{UserAccount, UserDirectory};
