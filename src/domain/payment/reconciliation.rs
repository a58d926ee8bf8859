//! Webhook reconciliation engine.
//!
//! Receives gateway notifications, fetches the authoritative payment detail,
//! durably records it, and drives the status state machine
//! (pending -> approved/rejected/cancelled) that provisions entitlements.
//!
//! ## Acknowledgment policy
//!
//! The engine reports a failure to the gateway (inviting redelivery) only
//! when it could not fetch the authoritative detail. Everything after that
//! point - persistence trouble, missing mappings, unknown users, grant
//! failures - is logged and acknowledged as success, so an event that was
//! already classified never triggers a retry storm.
//!
//! ## Idempotency
//!
//! Replaying an event converges: the payment upsert is keyed on the
//! external ID and the entitlement write is insert-or-ignore on the payment
//! ID, so N deliveries leave one record and at most one grant.

use std::sync::Arc;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::{PaymentRecord, PaymentStatus, WebhookNotification};
use crate::ports::{
    EntitlementRepository, GatewayError, GrantOutcome, PaymentGateway, PaymentRepository,
    PaymentUserMapRepository, UserDirectory,
};

/// Fixed access window granted per approved payment.
pub const ENTITLEMENT_WINDOW_DAYS: i64 = 30;

/// How a notification was resolved.
///
/// Every variant except the error case acknowledges success to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Non-payment event type or missing payment ID; nothing to do.
    Ignored,
    /// Detail persisted; status required no entitlement action.
    Recorded { status: PaymentStatus },
    /// The local upsert failed; logged for operational follow-up.
    PersistFailed { status: PaymentStatus },
    /// Approved payment with no user-map row; grant skipped.
    SkippedNoMapping,
    /// Approved payment whose mapped email resolves to no user; grant skipped.
    SkippedNoUser,
    /// A fresh entitlement was granted.
    EntitlementGranted,
    /// A grant for this payment already existed (idempotent replay).
    EntitlementAlreadyGranted,
    /// The grant write failed after the record was persisted; logged.
    GrantFailed,
}

/// The only webhook failure surfaced to the gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReconcileError {
    /// Authoritative detail could not be fetched; the gateway should retry.
    #[error("Failed to fetch payment detail from gateway: {0}")]
    GatewayFetch(#[from] GatewayError),
}

/// Reconciles gateway notifications against local state.
///
/// All collaborators are injected at construction; the engine holds no
/// global state and one instance serves the whole process.
pub struct WebhookReconciler {
    gateway: Arc<dyn PaymentGateway>,
    payments: Arc<dyn PaymentRepository>,
    user_map: Arc<dyn PaymentUserMapRepository>,
    entitlements: Arc<dyn EntitlementRepository>,
    users: Arc<dyn UserDirectory>,
}

impl WebhookReconciler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        payments: Arc<dyn PaymentRepository>,
        user_map: Arc<dyn PaymentUserMapRepository>,
        entitlements: Arc<dyn EntitlementRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            gateway,
            payments,
            user_map,
            entitlements,
            users,
        }
    }

    /// Process one inbound notification.
    ///
    /// # Returns
    ///
    /// - `Ok(outcome)` - acknowledged to the gateway as success
    /// - `Err(ReconcileError::GatewayFetch)` - acknowledged as server error
    pub async fn process(
        &self,
        notification: &WebhookNotification,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(payment_id) = notification.payment_id() else {
            tracing::debug!(
                event_type = notification.event_type.as_deref().unwrap_or("<none>"),
                "ignoring non-payment notification"
            );
            return Ok(ReconcileOutcome::Ignored);
        };

        let detail = self.gateway.get_payment(&payment_id).await?;
        tracing::info!(
            payment_id = %payment_id,
            status = %detail.status,
            amount = %detail.transaction_amount,
            "reconciling payment notification"
        );

        let record = PaymentRecord::from_gateway(&detail, Timestamp::now());

        // Every status transition is durably recorded before dispatch.
        if let Err(e) = self.payments.upsert(&record).await {
            tracing::error!(payment_id = %payment_id, error = %e, "payment upsert failed");
            return Ok(ReconcileOutcome::PersistFailed {
                status: record.status,
            });
        }

        match record.status {
            PaymentStatus::Approved => Ok(self.grant_entitlement(&record).await),
            PaymentStatus::Pending => {
                tracing::info!(payment_id = %payment_id, "payment pending, recorded");
                Ok(ReconcileOutcome::Recorded {
                    status: record.status,
                })
            }
            PaymentStatus::Rejected => {
                tracing::info!(
                    payment_id = %payment_id,
                    detail = %record.status_detail,
                    "payment rejected, recorded"
                );
                Ok(ReconcileOutcome::Recorded {
                    status: record.status,
                })
            }
            PaymentStatus::Cancelled => {
                tracing::info!(payment_id = %payment_id, "payment cancelled, recorded");
                Ok(ReconcileOutcome::Recorded {
                    status: record.status,
                })
            }
            PaymentStatus::Other(ref status) => {
                tracing::warn!(payment_id = %payment_id, status, "unhandled payment status");
                Ok(ReconcileOutcome::Recorded {
                    status: record.status.clone(),
                })
            }
        }
    }

    /// Resolve the paying user and grant the access window.
    ///
    /// Misses and failures here are soft stops: the payment record is
    /// already committed and the gateway must not be invited to retry.
    async fn grant_entitlement(&self, record: &PaymentRecord) -> ReconcileOutcome {
        let mapping = match self.user_map.find_by_payment_id(&record.external_id).await {
            Ok(Some(mapping)) => mapping,
            Ok(None) => {
                tracing::warn!(
                    payment_id = %record.external_id,
                    "no user mapping for approved payment, skipping entitlement"
                );
                return ReconcileOutcome::SkippedNoMapping;
            }
            Err(e) => {
                tracing::error!(payment_id = %record.external_id, error = %e, "user map lookup failed");
                return ReconcileOutcome::SkippedNoMapping;
            }
        };

        let user = match self.users.find_by_email(&mapping.email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(
                    payment_id = %record.external_id,
                    email = %mapping.email,
                    "no user account for mapped email, skipping entitlement"
                );
                return ReconcileOutcome::SkippedNoUser;
            }
            Err(e) => {
                tracing::error!(payment_id = %record.external_id, error = %e, "user lookup failed");
                return ReconcileOutcome::SkippedNoUser;
            }
        };

        let paid_at = record.approved_at.unwrap_or_else(Timestamp::now);
        let entitlement = Entitlement::grant(
            user.id,
            user.email.clone(),
            record.external_id.clone(),
            paid_at,
        );

        match self.entitlements.insert_if_absent(&entitlement).await {
            Ok(GrantOutcome::Created) => {
                tracing::info!(
                    payment_id = %record.external_id,
                    user_id = %user.id,
                    expires_at = %entitlement.expires_at,
                    "entitlement granted"
                );
                ReconcileOutcome::EntitlementGranted
            }
            Ok(GrantOutcome::AlreadyGranted) => {
                tracing::info!(
                    payment_id = %record.external_id,
                    "entitlement already granted, replay converged"
                );
                ReconcileOutcome::EntitlementAlreadyGranted
            }
            Err(e) => {
                tracing::error!(payment_id = %record.external_id, error = %e, "entitlement write failed");
                ReconcileOutcome::GrantFailed
            }
        }
    }
}
