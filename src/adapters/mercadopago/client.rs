//! Mercado Pago payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Mercado Pago REST API.
//! PIX charges are created through `POST /v1/payments` and looked up through
//! `GET /v1/payments/{id}`.
//!
//! # Retry policy
//!
//! Lookups are retried a bounded number of times with linear backoff,
//! because a lost GET is harmless. Creation is issued exactly once: the
//! request may have reached the gateway even when the response was lost,
//! and a second attempt could charge the payer twice. An idempotency key
//! accompanies every creation so a gateway-side dedupe can catch what we
//! will not retry.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::domain::foundation::PaymentId;
use crate::ports::{CreatePaymentRequest, GatewayError, GatewayPayment, PaymentGateway};

/// Lookup attempts before giving up (initial call included).
const GET_MAX_ATTEMPTS: u32 = 3;

/// Base delay between lookup attempts; grows linearly per attempt.
const GET_RETRY_DELAY_MS: u64 = 200;

/// Mercado Pago API configuration.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    /// Access token (APP_USR-... or TEST-...).
    access_token: SecretString,

    /// Base URL for the API (default: https://api.mercadopago.com).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl MercadoPagoConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            api_base_url: "https://api.mercadopago.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wire shape of `POST /v1/payments`.
#[derive(Debug, Serialize)]
struct CreatePaymentBody {
    transaction_amount: rust_decimal::Decimal,
    description: String,
    payment_method_id: String,
    payer: PayerBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct PayerBody {
    email: String,
}

/// Mercado Pago gateway client.
pub struct MercadoPagoClient {
    config: MercadoPagoConfig,
    http_client: reqwest::Client,
}

impl MercadoPagoClient {
    pub fn new(config: MercadoPagoConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn payments_url(&self) -> String {
        format!("{}/v1/payments", self.config.api_base_url)
    }

    async fn decode_payment(response: reqwest::Response) -> Result<GatewayPayment, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<GatewayPayment>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn get_payment_once(&self, id: &PaymentId) -> Result<GatewayPayment, GatewayError> {
        let url = format!("{}/{}", self.payments_url(), id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Self::decode_payment(response).await
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<GatewayPayment, GatewayError> {
        let body = CreatePaymentBody {
            transaction_amount: request.amount,
            description: request.description,
            payment_method_id: request.payment_method_id,
            payer: PayerBody {
                email: request.payer_email,
            },
            notification_url: if request.notification_url.is_empty() {
                None
            } else {
                Some(request.notification_url)
            },
        };

        // Single attempt. The idempotency key lets the gateway dedupe a
        // request whose response we never saw.
        let idempotency_key = uuid::Uuid::new_v4().to_string();
        let response = self
            .http_client
            .post(self.payments_url())
            .bearer_auth(self.config.access_token.expose_secret())
            .header("X-Idempotency-Key", &idempotency_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "payment creation request failed");
                GatewayError::Network(e.to_string())
            })?;

        let payment = Self::decode_payment(response).await?;
        tracing::debug!(
            payment_id = %payment.id,
            idempotency_key = %idempotency_key,
            "payment created at Mercado Pago"
        );
        Ok(payment)
    }

    async fn get_payment(&self, id: &PaymentId) -> Result<GatewayPayment, GatewayError> {
        let mut attempt = 1;
        loop {
            match self.get_payment_once(id).await {
                Ok(payment) => return Ok(payment),
                Err(e) if e.is_retryable() && attempt < GET_MAX_ATTEMPTS => {
                    let delay = Duration::from_millis(GET_RETRY_DELAY_MS * u64::from(attempt));
                    tracing::warn!(
                        payment_id = %id,
                        attempt,
                        error = %e,
                        "payment lookup failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
