//! PostgreSQL implementation of EntitlementRepository.
//!
//! The `entitlements.payment_id` column carries a UNIQUE constraint, so
//! `insert_if_absent` can use insert-or-ignore and let the database decide
//! races between concurrent webhook deliveries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{Entitlement, EntitlementStatus};
use crate::domain::foundation::{DomainError, EntitlementId, PaymentId, Timestamp, UserId};
use crate::ports::{EntitlementRepository, GrantOutcome};

/// PostgreSQL implementation of the EntitlementRepository port.
pub struct PostgresEntitlementRepository {
    pool: PgPool,
}

impl PostgresEntitlementRepository {
    /// Creates a new PostgresEntitlementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntitlementRow {
    id: Uuid,
    user_id: Uuid,
    email: String,
    payment_id: String,
    paid_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    status: String,
}

fn parse_status(s: &str) -> Result<EntitlementStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(EntitlementStatus::Active),
        "expired" => Ok(EntitlementStatus::Expired),
        _ => Err(DomainError::database(format!(
            "Invalid entitlement status value: {}",
            s
        ))),
    }
}

impl TryFrom<EntitlementRow> for Entitlement {
    type Error = DomainError;

    fn try_from(row: EntitlementRow) -> Result<Self, Self::Error> {
        Ok(Entitlement {
            id: EntitlementId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            email: row.email,
            payment_id: PaymentId::new(row.payment_id),
            paid_at: Timestamp::from_datetime(row.paid_at),
            expires_at: Timestamp::from_datetime(row.expires_at),
            status: parse_status(&row.status)?,
        })
    }
}

#[async_trait]
impl EntitlementRepository for PostgresEntitlementRepository {
    async fn insert_if_absent(
        &self,
        entitlement: &Entitlement,
    ) -> Result<GrantOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO entitlements (id, user_id, email, payment_id, paid_at, expires_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (payment_id) DO NOTHING
            "#,
        )
        .bind(entitlement.id.as_uuid())
        .bind(entitlement.user_id.as_uuid())
        .bind(&entitlement.email)
        .bind(entitlement.payment_id.as_str())
        .bind(entitlement.paid_at.as_datetime())
        .bind(entitlement.expires_at.as_datetime())
        .bind(entitlement.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert entitlement: {}", e)))?;

        if result.rows_affected() == 0 {
            Ok(GrantOutcome::AlreadyGranted)
        } else {
            Ok(GrantOutcome::Created)
        }
    }

    async fn find_by_payment_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<Entitlement>, DomainError> {
        let row: Option<EntitlementRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, email, payment_id, paid_at, expires_at, status
            FROM entitlements
            WHERE payment_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find entitlement: {}", e)))?;

        row.map(Entitlement::try_from).transpose()
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Entitlement>, DomainError> {
        let rows: Vec<EntitlementRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, email, payment_id, paid_at, expires_at, status
            FROM entitlements
            WHERE email = $1
            ORDER BY paid_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list entitlements: {}", e)))?;

        rows.into_iter().map(Entitlement::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_case_insensitive() {
        assert_eq!(parse_status("ACTIVE").unwrap(), EntitlementStatus::Active);
        assert_eq!(parse_status("expired").unwrap(), EntitlementStatus::Expired);
    }

    #[test]
    fn parse_status_rejects_unknown_values() {
        assert!(parse_status("revoked").is_err());
    }
}
