//! Payment gateway configuration (Mercado Pago)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Mercado Pago gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Mercado Pago access token
    pub access_token: String,

    /// API base URL override (sandbox, test doubles)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.access_token.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_ACCESS_TOKEN"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.api_base_url, "https://api.mercadopago.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_validation_missing_token() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_relative_base_url() {
        let config = GatewayConfig {
            access_token: "APP_USR-xxx".to_string(),
            api_base_url: "api.mercadopago.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidGatewayUrl)
        ));
    }

    #[test]
    fn test_validation_valid_config() {
        let config = GatewayConfig {
            access_token: "APP_USR-xxx".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
