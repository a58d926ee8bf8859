//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a verified
//! token. They have no provider dependencies - any verifier (locally issued
//! JWT, external identity provider) can populate them via the
//! `TokenVerifier` port.

use thiserror::Error;

/// Authenticated user extracted from a validated token.
///
/// This is a domain type with no provider dependencies. The `subject` is the
/// identifier assigned by whichever verifier accepted the token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Subject claim from the token (provider-scoped user identifier).
    pub subject: String,

    /// User's email address from the token claims.
    pub email: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The verification service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
