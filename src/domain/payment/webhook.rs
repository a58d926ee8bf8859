//! Inbound webhook notification shape.
//!
//! The gateway notifies with `{type, data: {id}}`. Only `type == "payment"`
//! events carry work for this system; other event types are acknowledged
//! and ignored. The `id` field arrives as a JSON string or number depending
//! on the delivery channel, so both are accepted.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::PaymentId;

/// Gateway-initiated notification of a payment-status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookNotification {
    /// Event category; only "payment" triggers reconciliation.
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,

    #[serde(default)]
    pub data: Option<WebhookData>,
}

/// Data block of a webhook notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookData {
    #[serde(default, deserialize_with = "option_id_from_any")]
    pub id: Option<String>,
}

impl WebhookNotification {
    /// Builds a payment notification (test and internal use).
    pub fn payment(id: impl Into<String>) -> Self {
        Self {
            event_type: Some("payment".to_string()),
            data: Some(WebhookData {
                id: Some(id.into()),
            }),
        }
    }

    /// Returns the payment ID when this is a payment event carrying one.
    ///
    /// Anything else (other event types, missing data, missing or empty id)
    /// yields `None` and must be acknowledged without further work.
    pub fn payment_id(&self) -> Option<PaymentId> {
        if self.event_type.as_deref() != Some("payment") {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| d.id.as_deref())
            .filter(|id| !id.is_empty())
            .map(PaymentId::new)
    }
}

/// Accepts a JSON string or number and yields its string form.
pub fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn option_id_from_any<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
        None,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => Some(s),
        Raw::Number(n) => Some(n.to_string()),
        Raw::None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_event_with_string_id_is_actionable() {
        let event: WebhookNotification =
            serde_json::from_str(r#"{"type": "payment", "data": {"id": "123"}}"#).unwrap();
        assert_eq!(event.payment_id(), Some(PaymentId::new("123")));
    }

    #[test]
    fn payment_event_with_numeric_id_is_actionable() {
        let event: WebhookNotification =
            serde_json::from_str(r#"{"type": "payment", "data": {"id": 456}}"#).unwrap();
        assert_eq!(event.payment_id(), Some(PaymentId::new("456")));
    }

    #[test]
    fn non_payment_events_are_not_actionable() {
        let event: WebhookNotification =
            serde_json::from_str(r#"{"type": "plan", "data": {"id": "123"}}"#).unwrap();
        assert!(event.payment_id().is_none());
    }

    #[test]
    fn missing_type_is_not_actionable() {
        let event: WebhookNotification =
            serde_json::from_str(r#"{"data": {"id": "123"}}"#).unwrap();
        assert!(event.payment_id().is_none());
    }

    #[test]
    fn missing_or_empty_id_is_not_actionable() {
        let no_data: WebhookNotification =
            serde_json::from_str(r#"{"type": "payment"}"#).unwrap();
        assert!(no_data.payment_id().is_none());

        let no_id: WebhookNotification =
            serde_json::from_str(r#"{"type": "payment", "data": {}}"#).unwrap();
        assert!(no_id.payment_id().is_none());

        let empty_id: WebhookNotification =
            serde_json::from_str(r#"{"type": "payment", "data": {"id": ""}}"#).unwrap();
        assert!(empty_id.payment_id().is_none());
    }
}
