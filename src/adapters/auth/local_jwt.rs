//! Local HS256 token verifier.
//!
//! Validates tokens issued by this backend's own login flow. The signing
//! secret is symmetric, so this verifier never needs the network and is
//! placed first in the chain.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::TokenVerifier;

/// Configuration for the local token verifier.
#[derive(Clone)]
pub struct LocalJwtConfig {
    /// Symmetric signing secret shared with the token issuer.
    secret: SecretString,

    /// Expected issuer claim.
    pub issuer: String,

    /// Expected audience claim.
    pub audience: String,
}

impl LocalJwtConfig {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }
}

/// Claims carried by locally issued tokens.
#[derive(Debug, Serialize, Deserialize)]
struct LocalClaims {
    sub: String,
    iss: String,
    aud: String,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
}

/// Verifier for locally issued HS256 tokens.
pub struct LocalJwtVerifier {
    config: LocalJwtConfig,
}

impl LocalJwtVerifier {
    pub fn new(config: LocalJwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TokenVerifier for LocalJwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let key = DecodingKey::from_secret(self.config.secret.expose_secret().as_bytes());
        let token_data = decode::<LocalClaims>(token, &key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("local token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!(error = %e, "local token rejected");
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = token_data.claims;
        let email = claims.email.ok_or_else(|| {
            tracing::warn!("local token missing email claim");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(claims.sub, email))
    }
}
