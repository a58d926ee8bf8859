//! SyncPaymentHandler - Command handler forcing local state to gateway state.

use std::sync::Arc;

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::domain::payment::{PaymentError, PaymentRecord};
use crate::ports::{GatewayError, GatewayPayment, PaymentGateway, PaymentRepository};

/// Command to overwrite the local record with the gateway's current view.
#[derive(Debug, Clone)]
pub struct SyncPaymentCommand {
    pub payment_id: PaymentId,
}

/// Result of a forced synchronization.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub record: PaymentRecord,
    pub gateway: GatewayPayment,
    pub synchronized: bool,
}

/// Handler for manual reconciliation.
///
/// The recovery path for a payment whose webhook was lost: fetch the
/// authoritative detail and upsert it locally. Unlike the detail query,
/// a gateway failure here fails the command, because there is nothing
/// to synchronize from.
pub struct SyncPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    payments: Arc<dyn PaymentRepository>,
}

impl SyncPaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { gateway, payments }
    }

    pub async fn handle(&self, command: SyncPaymentCommand) -> Result<SyncResult, PaymentError> {
        let detail = match self.gateway.get_payment(&command.payment_id).await {
            Ok(detail) => detail,
            Err(GatewayError::Api { status: 404, .. }) => {
                return Err(PaymentError::NotFound(command.payment_id));
            }
            Err(e) => return Err(e.into()),
        };

        let record = PaymentRecord::from_gateway(&detail, Timestamp::now());
        self.payments
            .upsert(&record)
            .await
            .map_err(|e| PaymentError::infrastructure(e.to_string()))?;

        // Report what the store actually holds, not the record we built;
        // the upsert preserves columns (QR codes) this fetch may lack.
        let record = self
            .payments
            .find_by_external_id(&command.payment_id)
            .await
            .map_err(|e| PaymentError::infrastructure(e.to_string()))?
            .ok_or_else(|| {
                PaymentError::infrastructure("payment row missing after sync upsert")
            })?;

        tracing::info!(
            payment_id = %command.payment_id,
            status = %record.status,
            "payment synchronized from gateway"
        );

        let synchronized = record.status.as_str() == detail.status;
        Ok(SyncResult {
            record,
            gateway: detail,
            synchronized,
        })
    }
}
