//! PostgreSQL implementation of PaymentUserMapRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, PaymentId};
use crate::ports::{PaymentUserMap, PaymentUserMapRepository};

/// PostgreSQL implementation of the PaymentUserMapRepository port.
///
/// One row per created payment, written at creation time so the webhook
/// path can resolve who paid. Re-inserting the same payment keeps the
/// original email.
pub struct PostgresPaymentUserMapRepository {
    pool: PgPool,
}

impl PostgresPaymentUserMapRepository {
    /// Creates a new PostgresPaymentUserMapRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentUserMapRow {
    payment_id: String,
    email: String,
}

impl From<PaymentUserMapRow> for PaymentUserMap {
    fn from(row: PaymentUserMapRow) -> Self {
        PaymentUserMap::new(PaymentId::new(row.payment_id), row.email)
    }
}

#[async_trait]
impl PaymentUserMapRepository for PostgresPaymentUserMapRepository {
    async fn insert(&self, map: &PaymentUserMap) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_user_map (payment_id, email)
            VALUES ($1, $2)
            ON CONFLICT (payment_id) DO NOTHING
            "#,
        )
        .bind(map.payment_id.as_str())
        .bind(&map.email)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert payment-user map: {}", e)))?;

        Ok(())
    }

    async fn find_by_payment_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentUserMap>, DomainError> {
        let row: Option<PaymentUserMapRow> = sqlx::query_as(
            r#"
            SELECT payment_id, email
            FROM payment_user_map
            WHERE payment_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find payment-user map: {}", e)))?;

        Ok(row.map(PaymentUserMap::from))
    }
}
