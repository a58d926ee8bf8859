//! PostgreSQL implementation of PaymentRepository.
//!
//! Payments are keyed on the gateway-assigned external ID; `upsert` makes
//! webhook replays and manual syncs converge on the latest gateway view.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, PaymentId, Timestamp};
use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::ports::{PaymentFilter, PaymentRepository};

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Creates a new PostgresPaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    external_id: String,
    status: String,
    status_detail: String,
    amount: Decimal,
    description: String,
    payment_method_id: String,
    payer_email: String,
    external_reference: Option<String>,
    created_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    qr_code: Option<String>,
    qr_code_image: Option<String>,
    processed_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        PaymentRecord {
            external_id: PaymentId::new(row.external_id),
            status: PaymentStatus::parse(&row.status),
            status_detail: row.status_detail,
            amount: row.amount,
            description: row.description,
            payment_method_id: row.payment_method_id,
            payer_email: row.payer_email,
            external_reference: row.external_reference,
            created_at: Timestamp::from_datetime(row.created_at),
            approved_at: row.approved_at.map(Timestamp::from_datetime),
            qr_code: row.qr_code,
            qr_code_image: row.qr_code_image,
            processed_at: Timestamp::from_datetime(row.processed_at),
        }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn upsert(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                external_id, status, status_detail, amount, description,
                payment_method_id, payer_email, external_reference,
                created_at, approved_at, qr_code, qr_code_image, processed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (external_id) DO UPDATE SET
                status = EXCLUDED.status,
                status_detail = EXCLUDED.status_detail,
                amount = EXCLUDED.amount,
                description = EXCLUDED.description,
                payment_method_id = EXCLUDED.payment_method_id,
                payer_email = EXCLUDED.payer_email,
                external_reference = EXCLUDED.external_reference,
                approved_at = EXCLUDED.approved_at,
                qr_code = COALESCE(EXCLUDED.qr_code, payments.qr_code),
                qr_code_image = COALESCE(EXCLUDED.qr_code_image, payments.qr_code_image),
                processed_at = EXCLUDED.processed_at
            "#,
        )
        .bind(record.external_id.as_str())
        .bind(record.status.as_str())
        .bind(&record.status_detail)
        .bind(record.amount)
        .bind(&record.description)
        .bind(&record.payment_method_id)
        .bind(&record.payer_email)
        .bind(&record.external_reference)
        .bind(record.created_at.as_datetime())
        .bind(record.approved_at.as_ref().map(Timestamp::as_datetime))
        .bind(&record.qr_code)
        .bind(&record.qr_code_image)
        .bind(record.processed_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert payment: {}", e)))?;

        Ok(())
    }

    async fn find_by_external_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentRecord>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT external_id, status, status_detail, amount, description,
                   payment_method_id, payer_email, external_reference,
                   created_at, approved_at, qr_code, qr_code_image, processed_at
            FROM payments
            WHERE external_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find payment: {}", e)))?;

        Ok(row.map(PaymentRecord::from))
    }

    async fn list(
        &self,
        filter: &PaymentFilter,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT external_id, status, status_detail, amount, description,
                   payment_method_id, payer_email, external_reference,
                   created_at, approved_at, qr_code, qr_code_image, processed_at
            FROM payments
            WHERE ($1::text IS NULL OR payer_email = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(filter.payer_email.as_deref())
        .bind(filter.status.as_ref().map(PaymentStatus::as_str))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list payments: {}", e)))?;

        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }
}
