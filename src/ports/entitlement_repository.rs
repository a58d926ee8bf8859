//! Entitlement store port.
//!
//! An approved payment grants exactly one access window. The store enforces
//! this with a uniqueness constraint on the payment ID and an
//! insert-or-ignore write, so concurrent duplicate webhook deliveries for
//! the same approval cannot create duplicate grants.

use async_trait::async_trait;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{DomainError, PaymentId};

/// Result of an insert-or-ignore grant write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// A new entitlement row was created.
    Created,
    /// A grant for this payment already existed; nothing was written.
    AlreadyGranted,
}

/// Port for the entitlement store.
#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    /// Insert the entitlement unless one already exists for its payment ID.
    async fn insert_if_absent(
        &self,
        entitlement: &Entitlement,
    ) -> Result<GrantOutcome, DomainError>;

    /// Find the entitlement granted for a payment, if any.
    async fn find_by_payment_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<Entitlement>, DomainError>;

    /// List entitlements granted to a payer email, newest first.
    async fn list_by_email(&self, email: &str) -> Result<Vec<Entitlement>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn EntitlementRepository) {}
    }

    #[test]
    fn grant_outcome_distinguishes_duplicate_writes() {
        assert_ne!(GrantOutcome::Created, GrantOutcome::AlreadyGranted);
    }
}
