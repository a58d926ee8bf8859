//! ListPaymentsHandler - Query handler for the payment listing endpoint.

use std::sync::Arc;

use crate::domain::payment::{PaymentError, PaymentRecord, PaymentStatus};
use crate::ports::{PaymentFilter, PaymentRepository};

/// Hard cap on listing size; the endpoint is for support, not export.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Query with optional equality filters.
#[derive(Debug, Clone, Default)]
pub struct ListPaymentsQuery {
    pub payer_email: Option<String>,
    pub status: Option<PaymentStatus>,
}

/// Handler for listing locally recorded payments, newest first.
pub struct ListPaymentsHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl ListPaymentsHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn handle(
        &self,
        query: ListPaymentsQuery,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        let filter = PaymentFilter {
            payer_email: query.payer_email,
            status: query.status,
        };

        self.payments
            .list(&filter, MAX_PAGE_SIZE)
            .await
            .map_err(|e| PaymentError::infrastructure(e.to_string()))
    }
}
