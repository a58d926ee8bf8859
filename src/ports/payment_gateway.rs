//! Payment gateway port for the external payment processor.
//!
//! Defines the contract this system relies on from Mercado Pago: create a
//! PIX payment and fetch a payment by ID. The gateway is the single source
//! of truth for payment status; local records only mirror it.
//!
//! # Design
//!
//! - **Interface only**: the core never sees HTTP or SDK types
//! - **Create is never retried**: a retried create could double-charge
//! - **Fetch is idempotent**: adapters may retry with backoff

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::PaymentId;

/// Port for the external payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment at the gateway.
    ///
    /// Single attempt by contract; implementations must not retry because a
    /// duplicate create could charge the payer twice.
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<GatewayPayment, GatewayError>;

    /// Fetch the authoritative payment detail by gateway ID.
    ///
    /// Safe to retry; implementations should apply bounded retries with
    /// backoff for transient failures.
    async fn get_payment(&self, id: &PaymentId) -> Result<GatewayPayment, GatewayError>;
}

/// Request to create a payment at the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub description: String,
    pub payment_method_id: String,
    pub payer_email: String,
    pub notification_url: String,
}

/// Payment detail as reported by the gateway.
///
/// Field names follow the gateway's wire format so the creation endpoint can
/// echo the object back to the caller unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayment {
    /// Gateway-assigned payment ID. Empty when the gateway omitted it,
    /// which the reconciliation engine must tolerate.
    #[serde(default, deserialize_with = "crate::domain::payment::id_from_any")]
    pub id: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub status_detail: Option<String>,

    #[serde(default)]
    pub transaction_amount: Decimal,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub payment_method_id: Option<String>,

    #[serde(default)]
    pub payer: Option<GatewayPayer>,

    #[serde(default)]
    pub external_reference: Option<String>,

    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub date_approved: Option<DateTime<Utc>>,

    #[serde(default)]
    pub point_of_interaction: Option<PointOfInteraction>,
}

impl GatewayPayment {
    /// Returns the payer email when present.
    pub fn payer_email(&self) -> Option<&str> {
        self.payer.as_deref_email()
    }

    /// Returns the PIX QR code payload when present.
    pub fn qr_code(&self) -> Option<&str> {
        self.point_of_interaction
            .as_ref()
            .and_then(|p| p.transaction_data.as_ref())
            .and_then(|t| t.qr_code.as_deref())
    }

    /// Returns the base64 QR code image when present.
    pub fn qr_code_base64(&self) -> Option<&str> {
        self.point_of_interaction
            .as_ref()
            .and_then(|p| p.transaction_data.as_ref())
            .and_then(|t| t.qr_code_base64.as_deref())
    }
}

/// Payer block of the gateway payment object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayer {
    #[serde(default)]
    pub email: Option<String>,
}

trait PayerEmail {
    fn as_deref_email(&self) -> Option<&str>;
}

impl PayerEmail for Option<GatewayPayer> {
    fn as_deref_email(&self) -> Option<&str> {
        self.as_ref().and_then(|p| p.email.as_deref())
    }
}

/// PIX interaction block carrying the QR code artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInteraction {
    #[serde(default)]
    pub transaction_data: Option<PixTransactionData>,
}

/// PIX payload artifacts from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixTransactionData {
    #[serde(default)]
    pub qr_code: Option<String>,

    #[serde(default)]
    pub qr_code_base64: Option<String>,
}

/// Errors from gateway operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Network-level failure reaching the gateway.
    #[error("Gateway unreachable: {0}")]
    Network(String),

    /// The gateway rejected the call; `detail` carries its response verbatim.
    #[error("Gateway rejected the request ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The gateway responded with a body this system cannot interpret.
    #[error("Unreadable gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Whether a retry of an idempotent call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
            GatewayError::InvalidResponse(_) => false,
        }
    }

    /// The gateway-provided detail for surfacing to callers.
    pub fn detail(&self) -> String {
        match self {
            GatewayError::Network(msg) | GatewayError::InvalidResponse(msg) => msg.clone(),
            GatewayError::Api { detail, .. } => detail.clone(),
        }
    }
}
