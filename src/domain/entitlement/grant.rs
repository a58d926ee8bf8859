//! Access entitlement granted for an approved payment.
//!
//! An entitlement references the paying user by ID and email only; no
//! credential material of any kind is ever stored alongside the grant.
//! Expiry is computed from the payment date, not enforced by a background
//! sweep: callers check `is_expired` / `effective_status` on read.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntitlementId, PaymentId, Timestamp, UserId};
use crate::domain::payment::ENTITLEMENT_WINDOW_DAYS;

/// Stored entitlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementStatus {
    Active,
    Expired,
}

impl EntitlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementStatus::Active => "active",
            EntitlementStatus::Expired => "expired",
        }
    }
}

/// A time-boxed access grant created for exactly one approved payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: EntitlementId,
    pub user_id: UserId,
    /// Denormalized payer email for lookup convenience.
    pub email: String,
    /// Gateway payment that funded this grant. Unique per entitlement.
    pub payment_id: PaymentId,
    pub paid_at: Timestamp,
    /// Always `paid_at` plus the fixed access window.
    pub expires_at: Timestamp,
    pub status: EntitlementStatus,
}

impl Entitlement {
    /// Grants a fresh entitlement for an approved payment.
    ///
    /// `paid_at` is the gateway's approval timestamp, or the processing
    /// time when the gateway omitted it.
    pub fn grant(
        user_id: UserId,
        email: impl Into<String>,
        payment_id: PaymentId,
        paid_at: Timestamp,
    ) -> Self {
        Self {
            id: EntitlementId::new(),
            user_id,
            email: email.into(),
            payment_id,
            paid_at,
            expires_at: paid_at.add_days(ENTITLEMENT_WINDOW_DAYS),
            status: EntitlementStatus::Active,
        }
    }

    /// Whether the access window has elapsed at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Status with expiry computed on read.
    pub fn effective_status(&self, now: Timestamp) -> EntitlementStatus {
        if self.is_expired(now) {
            EntitlementStatus::Expired
        } else {
            self.status
        }
    }
}
