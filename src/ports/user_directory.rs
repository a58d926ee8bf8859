//! User directory port.
//!
//! Users are an external collaborator entity: identified by email, resolved
//! via lookup, never mutated by this subsystem.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// A user account as seen by this subsystem.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
}

/// Read-only lookup of user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError>;
}
