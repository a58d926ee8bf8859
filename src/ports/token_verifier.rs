//! Token verification port.
//!
//! The API accepts either a locally issued signed token or a token from the
//! external identity provider. Each verifier implements this port; the auth
//! adapter composes them into an ordered chain where the first success wins.
//!
//! # Contract
//!
//! Implementations must:
//! - Validate the token signature
//! - Validate issuer, audience, and expiry claims
//! - Return `AuthError::InvalidToken` for malformed/bad signature tokens
//! - Return `AuthError::TokenExpired` for expired tokens
//! - Return `AuthError::ServiceUnavailable` for transient errors

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates bearer tokens and extracts user identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
