//! Mock token verifier for tests and local development.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::TokenVerifier;

/// Canned-response verifier.
pub struct MockTokenVerifier {
    response: Result<AuthenticatedUser, AuthError>,
}

impl MockTokenVerifier {
    /// Accepts every token as the given user.
    pub fn accepting(subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            response: Ok(AuthenticatedUser::new(subject, email)),
        }
    }

    /// Rejects every token.
    pub fn rejecting() -> Self {
        Self {
            response: Err(AuthError::InvalidToken),
        }
    }

    /// Fails every verification as a transient outage.
    pub fn unavailable() -> Self {
        Self {
            response: Err(AuthError::service_unavailable("mock outage")),
        }
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, _token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.response.clone()
    }
}
