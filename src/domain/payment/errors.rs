//! Payment domain error taxonomy.

use thiserror::Error;

use crate::domain::foundation::{DomainError, PaymentId};
use crate::ports::GatewayError;

/// Errors surfaced by the payment application handlers.
///
/// Each variant maps to a distinct HTTP response class in the adapter
/// layer; webhook handling deliberately does not use this type for
/// business-logic misses (those are logged soft stops, never failures).
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// A required request field is missing or malformed. No side effects.
    #[error("Validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// The gateway was unreachable or rejected the call; detail is verbatim.
    #[error("Payment gateway error: {detail}")]
    Gateway { detail: String },

    /// No local record exists for the requested payment.
    #[error("Payment {0} not found")]
    NotFound(PaymentId),

    /// Local store failure on a critical path.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl PaymentError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PaymentError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }
}

impl From<GatewayError> for PaymentError {
    fn from(err: GatewayError) -> Self {
        PaymentError::Gateway {
            detail: err.detail(),
        }
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        PaymentError::Infrastructure(err.to_string())
    }
}
