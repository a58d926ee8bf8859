//! Payment record store port.
//!
//! Persisted table of locally known payment attempts keyed by the gateway's
//! external payment ID. All writes are upserts on that key; the unique
//! constraint is load-bearing for concurrent webhook delivery.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId};
use crate::domain::payment::{PaymentRecord, PaymentStatus};

/// Optional equality filters for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub payer_email: Option<String>,
    pub status: Option<PaymentStatus>,
}

/// Port for the payment record store.
///
/// # Contract
///
/// - `upsert` inserts or fully replaces the row for `record.external_id`;
///   replaying the same record any number of times converges to one row
///   with the last-applied content.
/// - `list` returns at most `limit` records, newest `created_at` first.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert or update the record keyed on its external ID.
    async fn upsert(&self, record: &PaymentRecord) -> Result<(), DomainError>;

    /// Find a record by the gateway's payment ID.
    async fn find_by_external_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentRecord>, DomainError>;

    /// List records matching the filter, newest first, up to `limit`.
    async fn list(
        &self,
        filter: &PaymentFilter,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError>;
}
