//! Payment-to-user map port.
//!
//! Webhook payloads carry no direct user identity, so the payment creation
//! orchestrator records which payer email initiated each gateway payment.
//! Rows are written once at creation time and only ever read afterwards.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId};

/// Association between a gateway payment ID and the initiating payer email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUserMap {
    pub payment_id: PaymentId,
    pub email: String,
}

impl PaymentUserMap {
    pub fn new(payment_id: PaymentId, email: impl Into<String>) -> Self {
        Self {
            payment_id,
            email: email.into(),
        }
    }
}

/// Port for the payment-to-user association store.
#[async_trait]
pub trait PaymentUserMapRepository: Send + Sync {
    /// Record the association. Written at most once per payment ID.
    async fn insert(&self, map: &PaymentUserMap) -> Result<(), DomainError>;

    /// Resolve the payer email for a gateway payment ID.
    async fn find_by_payment_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentUserMap>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_user_map_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentUserMapRepository) {}
    }

    #[test]
    fn map_carries_id_and_email() {
        let map = PaymentUserMap::new(PaymentId::new("77"), "payer@example.com");
        assert_eq!(map.payment_id.as_str(), "77");
        assert_eq!(map.email, "payer@example.com");
    }
}
