//! Payment domain - records, webhook notifications, and reconciliation.

mod errors;
mod reconciliation;
mod record;
mod webhook;

pub use errors::PaymentError;
pub use reconciliation::{ReconcileError, ReconcileOutcome, WebhookReconciler, ENTITLEMENT_WINDOW_DAYS};
pub use record::{PaymentRecord, PaymentStatus};
pub use webhook::{id_from_any, WebhookNotification};
