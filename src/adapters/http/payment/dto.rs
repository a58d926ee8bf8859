//! Request/response DTOs for the payment endpoints.
//!
//! Wire names follow the gateway's own vocabulary (`transaction_amount`,
//! nested `payer.email`) so clients that already speak Mercado Pago need
//! no translation layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::ports::GatewayPayment;

/// `POST /api/payments` request body.
///
/// All five fields are required; `notification_url` defaults to empty so
/// its absence surfaces as a validation error rather than a decode error.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentBody {
    pub transaction_amount: Decimal,
    pub description: String,
    pub payment_method_id: String,
    pub payer: PayerBody,
    #[serde(default)]
    pub notification_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PayerBody {
    pub email: String,
}

/// `POST /api/payments` response: the fields a client needs to render the
/// PIX checkout.
#[derive(Debug, Serialize)]
pub struct PaymentCreatedResponse {
    pub id: String,
    pub status: String,
    pub status_detail: Option<String>,
    pub transaction_amount: Decimal,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_base64: Option<String>,
}

impl From<GatewayPayment> for PaymentCreatedResponse {
    fn from(payment: GatewayPayment) -> Self {
        let qr_code = payment.qr_code().map(str::to_string);
        let qr_code_base64 = payment.qr_code_base64().map(str::to_string);
        Self {
            id: payment.id,
            status: payment.status,
            status_detail: payment.status_detail,
            transaction_amount: payment.transaction_amount,
            description: payment.description,
            qr_code,
            qr_code_base64,
        }
    }
}

/// Gateway-side view embedded in detail and sync responses.
#[derive(Debug, Serialize)]
pub struct GatewayViewDto {
    pub id: String,
    pub status: String,
    pub status_detail: Option<String>,
    pub transaction_amount: Decimal,
    pub date_approved: Option<String>,
}

impl From<&GatewayPayment> for GatewayViewDto {
    fn from(payment: &GatewayPayment) -> Self {
        Self {
            id: payment.id.clone(),
            status: payment.status.clone(),
            status_detail: payment.status_detail.clone(),
            transaction_amount: payment.transaction_amount,
            date_approved: payment.date_approved.map(|d| d.to_rfc3339()),
        }
    }
}

/// `GET /api/payments/{id}` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentComparisonResponse {
    pub local: Option<PaymentRecord>,
    pub mercado_pago: Option<GatewayViewDto>,
    pub synchronized: bool,
}

/// `POST /api/payments/{id}/sync` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub local: PaymentRecord,
    pub mercado_pago: GatewayViewDto,
    pub synchronized: bool,
}

/// `GET /api/payments` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListPaymentsParams {
    pub email: Option<String>,
    pub status: Option<String>,
}

impl ListPaymentsParams {
    pub fn status_filter(&self) -> Option<PaymentStatus> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(PaymentStatus::parse)
    }
}

/// `GET /api/payments` response.
#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
    pub total: usize,
    pub payments: Vec<PaymentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_deserializes_nested_payer() {
        let body: CreatePaymentBody = serde_json::from_str(
            r#"{
                "transaction_amount": 49.9,
                "description": "Access plan",
                "payment_method_id": "pix",
                "payer": {"email": "payer@example.com"},
                "notification_url": "https://api.example.com/api/webhooks/mercadopago"
            }"#,
        )
        .unwrap();

        assert_eq!(body.payer.email, "payer@example.com");
        assert_eq!(body.transaction_amount, Decimal::new(499, 1));
        assert_eq!(
            body.notification_url,
            "https://api.example.com/api/webhooks/mercadopago"
        );
    }

    #[test]
    fn create_body_tolerates_missing_notification_url() {
        // Decodes to empty string; the handler rejects it as validation,
        // not as a malformed body.
        let body: CreatePaymentBody = serde_json::from_str(
            r#"{
                "transaction_amount": 49.9,
                "description": "Access plan",
                "payment_method_id": "pix",
                "payer": {"email": "payer@example.com"}
            }"#,
        )
        .unwrap();

        assert!(body.notification_url.is_empty());
    }

    #[test]
    fn list_params_parse_status_filter() {
        let params = ListPaymentsParams {
            email: None,
            status: Some("approved".to_string()),
        };
        assert_eq!(params.status_filter(), Some(PaymentStatus::Approved));

        let empty = ListPaymentsParams {
            email: None,
            status: Some(String::new()),
        };
        assert_eq!(empty.status_filter(), None);
    }

    #[test]
    fn comparison_response_uses_camel_case_gateway_key() {
        let response = PaymentComparisonResponse {
            local: None,
            mercado_pago: None,
            synchronized: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("mercadoPago").is_some());
        assert!(json.get("mercado_pago").is_none());
    }
}
