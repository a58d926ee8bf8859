//! GetPaymentHandler - Query handler comparing local and gateway state.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::{PaymentError, PaymentRecord};
use crate::ports::{GatewayPayment, PaymentGateway, PaymentRepository};

/// Query for a single payment by its gateway-assigned ID.
#[derive(Debug, Clone)]
pub struct GetPaymentQuery {
    pub payment_id: PaymentId,
}

/// Side-by-side view of both sources of truth.
#[derive(Debug, Clone)]
pub struct PaymentComparison {
    pub local: Option<PaymentRecord>,
    pub gateway: Option<GatewayPayment>,
    /// True only when both views exist and agree on status.
    pub synchronized: bool,
}

/// Handler for payment detail lookups.
///
/// Queries the local store and the gateway concurrently. Either source
/// may be missing; the lookup fails only when neither has the payment.
/// A gateway error degrades to a missing gateway view rather than
/// failing the whole query, since the local record alone is still
/// useful for support work.
pub struct GetPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    payments: Arc<dyn PaymentRepository>,
}

impl GetPaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { gateway, payments }
    }

    pub async fn handle(&self, query: GetPaymentQuery) -> Result<PaymentComparison, PaymentError> {
        let (local, remote) = tokio::join!(
            self.payments.find_by_external_id(&query.payment_id),
            self.gateway.get_payment(&query.payment_id),
        );

        let local = local.map_err(|e| PaymentError::infrastructure(e.to_string()))?;
        let gateway = match remote {
            Ok(payment) => Some(payment),
            Err(e) => {
                tracing::warn!(
                    payment_id = %query.payment_id,
                    error = %e,
                    "gateway lookup failed, serving local view only"
                );
                None
            }
        };

        if local.is_none() && gateway.is_none() {
            return Err(PaymentError::NotFound(query.payment_id));
        }

        let synchronized = match (&local, &gateway) {
            (Some(record), Some(remote)) => record.status.as_str() == remote.status,
            _ => false,
        };

        Ok(PaymentComparison {
            local,
            gateway,
            synchronized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, Timestamp};
    use crate::ports::{CreatePaymentRequest, GatewayError, PaymentFilter};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockGateway {
        response: Result<GatewayPayment, GatewayError>,
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn create_payment(
            &self,
            _request: CreatePaymentRequest,
        ) -> Result<GatewayPayment, GatewayError> {
            unimplemented!()
        }

        async fn get_payment(&self, _id: &PaymentId) -> Result<GatewayPayment, GatewayError> {
            self.response.clone()
        }
    }

    struct MockPayments {
        record: Option<PaymentRecord>,
        fail_read: bool,
    }

    #[async_trait]
    impl PaymentRepository for MockPayments {
        async fn upsert(&self, _record: &PaymentRecord) -> Result<(), DomainError> {
            unimplemented!()
        }

        async fn find_by_external_id(
            &self,
            _id: &PaymentId,
        ) -> Result<Option<PaymentRecord>, DomainError> {
            if self.fail_read {
                return Err(DomainError::database("Simulated read failure"));
            }
            Ok(self.record.clone())
        }

        async fn list(
            &self,
            _filter: &PaymentFilter,
            _limit: i64,
        ) -> Result<Vec<PaymentRecord>, DomainError> {
            unimplemented!()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn gateway_payment(id: &str, status: &str) -> GatewayPayment {
        GatewayPayment {
            id: id.to_string(),
            status: status.to_string(),
            status_detail: None,
            transaction_amount: Decimal::new(4990, 2),
            description: None,
            payment_method_id: Some("pix".to_string()),
            payer: None,
            external_reference: None,
            date_created: None,
            date_approved: None,
            point_of_interaction: None,
        }
    }

    fn local_record(id: &str, status: &str) -> PaymentRecord {
        PaymentRecord::from_gateway(&gateway_payment(id, status), Timestamp::now())
    }

    fn handler(
        remote: Result<GatewayPayment, GatewayError>,
        record: Option<PaymentRecord>,
    ) -> GetPaymentHandler {
        GetPaymentHandler::new(
            Arc::new(MockGateway { response: remote }),
            Arc::new(MockPayments {
                record,
                fail_read: false,
            }),
        )
    }

    fn query(id: &str) -> GetPaymentQuery {
        GetPaymentQuery {
            payment_id: PaymentId::new(id),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn synchronized_when_both_views_agree() {
        let handler = handler(
            Ok(gateway_payment("5", "approved")),
            Some(local_record("5", "approved")),
        );

        let comparison = handler.handle(query("5")).await.unwrap();

        assert!(comparison.synchronized);
        assert!(comparison.local.is_some());
        assert!(comparison.gateway.is_some());
    }

    #[tokio::test]
    async fn out_of_sync_when_statuses_differ() {
        let handler = handler(
            Ok(gateway_payment("5", "approved")),
            Some(local_record("5", "pending")),
        );

        let comparison = handler.handle(query("5")).await.unwrap();

        assert!(!comparison.synchronized);
    }

    #[tokio::test]
    async fn gateway_error_degrades_to_local_view() {
        let handler = handler(
            Err(GatewayError::Network("down".to_string())),
            Some(local_record("5", "pending")),
        );

        let comparison = handler.handle(query("5")).await.unwrap();

        assert!(comparison.gateway.is_none());
        assert!(comparison.local.is_some());
        assert!(!comparison.synchronized);
    }

    #[tokio::test]
    async fn missing_everywhere_is_not_found() {
        let handler = handler(
            Err(GatewayError::Api {
                status: 404,
                detail: "payment not found".to_string(),
            }),
            None,
        );

        let result = handler.handle(query("5")).await;

        assert!(matches!(result, Err(PaymentError::NotFound(_))));
    }

    #[tokio::test]
    async fn gateway_only_view_is_served() {
        let handler = handler(Ok(gateway_payment("5", "approved")), None);

        let comparison = handler.handle(query("5")).await.unwrap();

        assert!(comparison.local.is_none());
        assert!(comparison.gateway.is_some());
        assert!(!comparison.synchronized);
    }

    #[tokio::test]
    async fn local_read_failure_is_an_error() {
        let handler = GetPaymentHandler::new(
            Arc::new(MockGateway {
                response: Ok(gateway_payment("5", "approved")),
            }),
            Arc::new(MockPayments {
                record: None,
                fail_read: true,
            }),
        );

        let result = handler.handle(query("5")).await;

        assert!(matches!(result, Err(PaymentError::Infrastructure(_))));
    }
}
