//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration
///
/// Two verification modes run side by side: locally issued HS256 tokens
/// checked against `jwt_secret`, and identity-provider RS256 tokens
/// checked against the provider's published JWKS. The IdP section is
/// optional; when `idp_issuer_url` is unset only local tokens verify.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for locally issued tokens
    pub jwt_secret: String,

    /// Expected issuer for locally issued tokens
    pub jwt_issuer: String,

    /// Expected audience for locally issued tokens
    pub jwt_audience: String,

    /// Identity provider issuer URL (enables the RS256 fallback)
    pub idp_issuer_url: Option<String>,

    /// Expected audience for identity-provider tokens
    pub idp_audience: Option<String>,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    /// Get JWKS cache TTL as Duration
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Check whether the identity-provider fallback is configured
    pub fn idp_enabled(&self) -> bool {
        self.idp_issuer_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the IdP issuer URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.jwt_issuer.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_ISSUER"));
        }
        if self.jwt_audience.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_AUDIENCE"));
        }

        if let Some(issuer) = &self.idp_issuer_url {
            if !issuer.is_empty()
                && *environment == Environment::Production
                && !issuer.starts_with("https://")
            {
                return Err(ValidationError::IssuerMustBeHttps);
            }
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: String::new(),
            jwt_audience: String::new(),
            idp_issuer_url: None,
            idp_audience: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
