//! Locally persisted payment records mirroring gateway state.

use rust_decimal::Decimal;
use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::ports::GatewayPayment;

/// Payment status as reported by the gateway.
///
/// The gateway is authoritative and may report statuses this system has no
/// dispatch logic for; those are preserved verbatim as `Other` so the local
/// record still mirrors gateway state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    /// Parses a gateway status string. Never fails; unknown values are kept.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => PaymentStatus::Pending,
            "approved" => PaymentStatus::Approved,
            "rejected" => PaymentStatus::Rejected,
            "cancelled" => PaymentStatus::Cancelled,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    /// Returns the wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other(s) => s,
        }
    }

    /// Whether this status grants an entitlement on reconciliation.
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentStatus::Approved)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(D::Error::custom("payment status cannot be empty"));
        }
        Ok(PaymentStatus::parse(&s))
    }
}

/// Locally persisted mirror of a gateway payment.
///
/// Exactly one record exists per `external_id`; all writes are upserts on
/// that key and the last-written status wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Gateway-assigned payment ID. Immutable once set.
    pub external_id: PaymentId,

    pub status: PaymentStatus,

    pub status_detail: String,

    /// Transaction amount with minor-unit precision preserved.
    pub amount: Decimal,

    pub description: String,

    pub payment_method_id: String,

    pub payer_email: String,

    /// Caller-supplied correlation token, if any.
    pub external_reference: Option<String>,

    pub created_at: Timestamp,

    /// Gateway approval timestamp; unset until the payment is approved.
    pub approved_at: Option<Timestamp>,

    /// PIX copy-and-paste payload.
    pub qr_code: Option<String>,

    /// PIX QR code image, base64.
    pub qr_code_image: Option<String>,

    /// When this record was last written locally.
    pub processed_at: Timestamp,
}

impl PaymentRecord {
    /// Maps an authoritative gateway payment into a local record.
    ///
    /// Optional gateway fields fall back per contract: detail/description/
    /// method/payer email to empty strings, `date_created` to `now`, and
    /// `date_approved` stays unset when absent.
    pub fn from_gateway(payment: &GatewayPayment, now: Timestamp) -> Self {
        Self {
            external_id: PaymentId::new(payment.id.clone()),
            status: PaymentStatus::parse(&payment.status),
            status_detail: payment.status_detail.clone().unwrap_or_default(),
            amount: payment.transaction_amount,
            description: payment.description.clone().unwrap_or_default(),
            payment_method_id: payment.payment_method_id.clone().unwrap_or_default(),
            payer_email: payment.payer_email().unwrap_or_default().to_string(),
            external_reference: payment.external_reference.clone(),
            created_at: payment
                .date_created
                .map(Timestamp::from_datetime)
                .unwrap_or(now),
            approved_at: payment.date_approved.map(Timestamp::from_datetime),
            qr_code: payment.qr_code().map(str::to_string),
            qr_code_image: payment.qr_code_base64().map(str::to_string),
            processed_at: now,
        }
    }
}
