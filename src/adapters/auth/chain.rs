//! Ordered verifier chain.
//!
//! Tries each verifier in turn and returns the first success. The cheap
//! local verifier goes first so provider round-trips only happen for
//! tokens the backend did not issue itself.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::TokenVerifier;

/// Composes multiple verifiers; the first success wins.
///
/// When every verifier rejects the token, the chain reports the error of
/// the last verifier, except that a transient failure anywhere in the
/// chain takes precedence: the caller must not treat a provider outage as
/// a bad credential.
pub struct VerifierChain {
    verifiers: Vec<Arc<dyn TokenVerifier>>,
}

impl VerifierChain {
    pub fn new(verifiers: Vec<Arc<dyn TokenVerifier>>) -> Self {
        Self { verifiers }
    }
}

#[async_trait]
impl TokenVerifier for VerifierChain {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut transient: Option<AuthError> = None;
        let mut last_error = AuthError::InvalidToken;

        for verifier in &self.verifiers {
            match verifier.verify(token).await {
                Ok(user) => return Ok(user),
                Err(e) if e.is_transient() => {
                    tracing::warn!(error = %e, "verifier unavailable, trying next");
                    transient = Some(e);
                }
                Err(e) => last_error = e,
            }
        }

        Err(transient.unwrap_or(last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockTokenVerifier;

    #[tokio::test]
    async fn first_success_short_circuits() {
        let chain = VerifierChain::new(vec![
            Arc::new(MockTokenVerifier::accepting("uid-1", "a@example.com")),
            Arc::new(MockTokenVerifier::rejecting()),
        ]);

        let user = chain.verify("any-token").await.unwrap();

        assert_eq!(user.subject, "uid-1");
    }

    #[tokio::test]
    async fn falls_through_to_later_verifiers() {
        let chain = VerifierChain::new(vec![
            Arc::new(MockTokenVerifier::rejecting()),
            Arc::new(MockTokenVerifier::accepting("uid-2", "b@example.com")),
        ]);

        let user = chain.verify("any-token").await.unwrap();

        assert_eq!(user.subject, "uid-2");
        assert_eq!(user.email, "b@example.com");
    }

    #[tokio::test]
    async fn all_rejections_yield_invalid_token() {
        let chain = VerifierChain::new(vec![
            Arc::new(MockTokenVerifier::rejecting()),
            Arc::new(MockTokenVerifier::rejecting()),
        ]);

        assert!(matches!(
            chain.verify("any-token").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn transient_failure_outranks_a_rejection() {
        let chain = VerifierChain::new(vec![
            Arc::new(MockTokenVerifier::unavailable()),
            Arc::new(MockTokenVerifier::rejecting()),
        ]);

        assert!(matches!(
            chain.verify("any-token").await,
            Err(AuthError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn empty_chain_rejects() {
        let chain = VerifierChain::new(vec![]);

        assert!(matches!(
            chain.verify("any-token").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
