//! ProcessWebhookHandler - Thin shell over the reconciliation engine.

use std::sync::Arc;

use crate::domain::payment::{ReconcileError, ReconcileOutcome, WebhookReconciler, WebhookNotification};

/// Handler for inbound gateway notifications.
///
/// All policy lives in [`WebhookReconciler`]; this handler exists so the
/// HTTP layer depends on the application layer like every other route.
pub struct ProcessWebhookHandler {
    reconciler: Arc<WebhookReconciler>,
}

impl ProcessWebhookHandler {
    pub fn new(reconciler: Arc<WebhookReconciler>) -> Self {
        Self { reconciler }
    }

    pub async fn handle(
        &self,
        notification: WebhookNotification,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        self.reconciler.process(&notification).await
    }
}
