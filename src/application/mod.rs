//! Application layer - Use case orchestration.
//!
//! Handlers coordinate ports to fulfill API operations. They own
//! validation and sequencing but no business rules; those live in
//! the domain layer.

pub mod handlers;
