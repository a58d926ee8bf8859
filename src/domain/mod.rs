//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared value objects: identifiers, timestamps, errors,
//!   authentication types.
//! - `payment` - Payment records, webhook notifications, and the
//!   reconciliation engine.
//! - `entitlement` - Time-boxed access grants created for approved payments.

pub mod entitlement;
pub mod foundation;
pub mod payment;
