//! CreatePaymentHandler - Command handler for creating PIX charges.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::payment::PaymentError;
use crate::ports::{
    CreatePaymentRequest, GatewayPayment, PaymentGateway, PaymentUserMap, PaymentUserMapRepository,
};

/// Command to create a PIX charge at the gateway.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub amount: Decimal,
    pub description: String,
    pub payment_method_id: String,
    pub payer_email: String,
    pub notification_url: String,
}

/// Handler for creating payments.
///
/// # Contract
///
/// The gateway call is made exactly once. A timeout or ambiguous network
/// failure surfaces as an error rather than a retry, because a duplicate
/// call could charge the payer twice.
///
/// On success the payment is mapped to the payer's email so the webhook
/// path can resolve the user later. A mapping write failure is logged and
/// does not fail the request; the charge already exists at the gateway
/// and the caller must receive its QR code.
pub struct CreatePaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    user_map: Arc<dyn PaymentUserMapRepository>,
}

impl CreatePaymentHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        user_map: Arc<dyn PaymentUserMapRepository>,
    ) -> Self {
        Self { gateway, user_map }
    }

    pub async fn handle(
        &self,
        command: CreatePaymentCommand,
    ) -> Result<GatewayPayment, PaymentError> {
        Self::validate(&command)?;

        let request = CreatePaymentRequest {
            amount: command.amount,
            description: command.description,
            payment_method_id: command.payment_method_id,
            payer_email: command.payer_email.clone(),
            notification_url: command.notification_url,
        };

        let payment = self.gateway.create_payment(request).await?;

        if payment.id.is_empty() {
            tracing::error!(
                payer_email = %command.payer_email,
                "gateway accepted the charge but returned no payment id"
            );
            return Ok(payment);
        }

        tracing::info!(
            payment_id = %payment.id,
            status = %payment.status,
            amount = %payment.transaction_amount,
            "payment created at gateway"
        );

        let mapping = PaymentUserMap::new(payment.id.as_str().into(), command.payer_email);
        if let Err(e) = self.user_map.insert(&mapping).await {
            tracing::error!(
                payment_id = %payment.id,
                error = %e,
                "failed to persist payment-user mapping"
            );
        }

        Ok(payment)
    }

    fn validate(command: &CreatePaymentCommand) -> Result<(), PaymentError> {
        if command.amount <= Decimal::ZERO {
            return Err(PaymentError::validation(
                "transaction_amount",
                "must be greater than zero",
            ));
        }
        if command.description.trim().is_empty() {
            return Err(PaymentError::validation("description", "must not be empty"));
        }
        if command.payment_method_id.trim().is_empty() {
            return Err(PaymentError::validation(
                "payment_method_id",
                "must not be empty",
            ));
        }
        if command.payer_email.trim().is_empty() {
            return Err(PaymentError::validation("payer.email", "must not be empty"));
        }
        if command.notification_url.trim().is_empty() {
            return Err(PaymentError::validation(
                "notification_url",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, PaymentId};
    use crate::ports::GatewayError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockGateway {
        response: Result<GatewayPayment, GatewayError>,
        calls: AtomicUsize,
    }

    impl MockGateway {
        fn succeeding(payment: GatewayPayment) -> Self {
            Self {
                response: Ok(payment),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: GatewayError) -> Self {
            Self {
                response: Err(error),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn create_payment(
            &self,
            _request: CreatePaymentRequest,
        ) -> Result<GatewayPayment, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        async fn get_payment(&self, _id: &PaymentId) -> Result<GatewayPayment, GatewayError> {
            unimplemented!("lookup is not exercised by creation tests")
        }
    }

    #[derive(Default)]
    struct MockUserMap {
        rows: Mutex<Vec<PaymentUserMap>>,
        fail_insert: bool,
    }

    impl MockUserMap {
        fn failing() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail_insert: true,
            }
        }

        fn rows(&self) -> Vec<PaymentUserMap> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentUserMapRepository for MockUserMap {
        async fn insert(&self, map: &PaymentUserMap) -> Result<(), DomainError> {
            if self.fail_insert {
                return Err(DomainError::database("Simulated write failure"));
            }
            self.rows.lock().unwrap().push(map.clone());
            Ok(())
        }

        async fn find_by_payment_id(
            &self,
            id: &PaymentId,
        ) -> Result<Option<PaymentUserMap>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|m| &m.payment_id == id)
                .cloned())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_command() -> CreatePaymentCommand {
        CreatePaymentCommand {
            amount: Decimal::new(4990, 2),
            description: "PIX access".to_string(),
            payment_method_id: "pix".to_string(),
            payer_email: "payer@example.com".to_string(),
            notification_url: "https://api.example.com/api/webhooks/mercadopago".to_string(),
        }
    }

    fn pending_gateway_payment(id: &str) -> GatewayPayment {
        GatewayPayment {
            id: id.to_string(),
            status: "pending".to_string(),
            status_detail: Some("pending_waiting_transfer".to_string()),
            transaction_amount: Decimal::new(4990, 2),
            description: Some("PIX access".to_string()),
            payment_method_id: Some("pix".to_string()),
            payer: None,
            external_reference: None,
            date_created: None,
            date_approved: None,
            point_of_interaction: None,
        }
    }

    fn handler(
        gateway: Arc<MockGateway>,
        user_map: Arc<MockUserMap>,
    ) -> CreatePaymentHandler {
        CreatePaymentHandler::new(gateway, user_map)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_payment_and_maps_payer() {
        let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("123")));
        let user_map = Arc::new(MockUserMap::default());

        let result = handler(gateway.clone(), user_map.clone())
            .handle(test_command())
            .await;

        let payment = result.unwrap();
        assert_eq!(payment.id, "123");
        assert_eq!(gateway.call_count(), 1);

        let rows = user_map.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payment_id, PaymentId::new("123"));
        assert_eq!(rows[0].email, "payer@example.com");
    }

    #[tokio::test]
    async fn mapping_failure_does_not_fail_the_request() {
        let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("123")));
        let user_map = Arc::new(MockUserMap::failing());

        let result = handler(gateway, user_map).handle(test_command()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn empty_gateway_id_skips_mapping_but_returns_payment() {
        let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("")));
        let user_map = Arc::new(MockUserMap::default());

        let result = handler(gateway, user_map.clone())
            .handle(test_command())
            .await;

        assert!(result.is_ok());
        assert!(user_map.rows().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn rejects_zero_amount_without_calling_gateway() {
        let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("123")));
        let user_map = Arc::new(MockUserMap::default());

        let mut command = test_command();
        command.amount = Decimal::ZERO;

        let result = handler(gateway.clone(), user_map).handle(command).await;

        assert!(matches!(
            result,
            Err(PaymentError::Validation { ref field, .. }) if field == "transaction_amount"
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("123")));
        let mut command = test_command();
        command.amount = Decimal::new(-100, 2);

        let result = handler(gateway, Arc::new(MockUserMap::default()))
            .handle(command)
            .await;

        assert!(matches!(result, Err(PaymentError::Validation { .. })));
    }

    #[tokio::test]
    async fn rejects_missing_notification_url_without_calling_gateway() {
        let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("123")));
        let mut command = test_command();
        command.notification_url = String::new();

        let result = handler(gateway.clone(), Arc::new(MockUserMap::default()))
            .handle(command)
            .await;

        assert!(matches!(
            result,
            Err(PaymentError::Validation { ref field, .. }) if field == "notification_url"
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn rejects_blank_fields() {
        for field in ["description", "payment_method_id", "payer_email"] {
            let gateway = Arc::new(MockGateway::succeeding(pending_gateway_payment("123")));
            let mut command = test_command();
            match field {
                "description" => command.description = "  ".to_string(),
                "payment_method_id" => command.payment_method_id = String::new(),
                _ => command.payer_email = String::new(),
            }

            let result = handler(gateway, Arc::new(MockUserMap::default()))
                .handle(command)
                .await;

            assert!(
                matches!(result, Err(PaymentError::Validation { .. })),
                "expected validation failure for blank {field}"
            );
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Gateway Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn gateway_failure_is_never_retried() {
        let gateway = Arc::new(MockGateway::failing(GatewayError::Network(
            "timed out".to_string(),
        )));
        let user_map = Arc::new(MockUserMap::default());

        let result = handler(gateway.clone(), user_map.clone())
            .handle(test_command())
            .await;

        assert!(matches!(result, Err(PaymentError::Gateway { .. })));
        assert_eq!(gateway.call_count(), 1);
        assert!(user_map.rows().is_empty());
    }
}
