//! HTTP handlers for payment endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::payment::{
    CreatePaymentCommand, CreatePaymentHandler, GetPaymentHandler, GetPaymentQuery,
    ListPaymentsHandler, ListPaymentsQuery, ProcessWebhookHandler, SyncPaymentCommand,
    SyncPaymentHandler,
};
use crate::domain::foundation::PaymentId;
use crate::domain::payment::{PaymentError, WebhookNotification};

use super::dto::{
    GatewayViewDto, ListPaymentsParams, ListPaymentsResponse, CreatePaymentBody,
    PaymentComparisonResponse, PaymentCreatedResponse, SyncResponse,
};

/// Shared state for payment routes.
#[derive(Clone)]
pub struct PaymentAppState {
    pub create_payment: Arc<CreatePaymentHandler>,
    pub get_payment: Arc<GetPaymentHandler>,
    pub sync_payment: Arc<SyncPaymentHandler>,
    pub list_payments: Arc<ListPaymentsHandler>,
    pub process_webhook: Arc<ProcessWebhookHandler>,
}

/// API error wrapper mapping domain errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(e: PaymentError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            PaymentError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            PaymentError::NotFound(_) => (StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND"),
            PaymentError::Gateway { .. } => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
            PaymentError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "payment request failed");
        }

        (
            status,
            Json(serde_json::json!({
                "error": self.0.to_string(),
                "code": code
            })),
        )
            .into_response()
    }
}

/// `POST /api/payments` - Create a PIX charge.
pub async fn create_payment(
    State(state): State<PaymentAppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreatePaymentBody>,
) -> Result<impl IntoResponse, PaymentApiError> {
    tracing::debug!(user = %user.subject, payer = %body.payer.email, "creating payment");

    let payment = state
        .create_payment
        .handle(CreatePaymentCommand {
            amount: body.transaction_amount,
            description: body.description,
            payment_method_id: body.payment_method_id,
            payer_email: body.payer.email,
            notification_url: body.notification_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentCreatedResponse::from(payment)),
    ))
}

/// `GET /api/payments/{id}` - Local and gateway views side by side.
pub async fn get_payment(
    State(state): State<PaymentAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<PaymentComparisonResponse>, PaymentApiError> {
    let comparison = state
        .get_payment
        .handle(GetPaymentQuery {
            payment_id: PaymentId::new(id),
        })
        .await?;

    Ok(Json(PaymentComparisonResponse {
        local: comparison.local,
        mercado_pago: comparison.gateway.as_ref().map(GatewayViewDto::from),
        synchronized: comparison.synchronized,
    }))
}

/// `POST /api/payments/{id}/sync` - Force local state to match the gateway.
pub async fn sync_payment(
    State(state): State<PaymentAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<SyncResponse>, PaymentApiError> {
    let result = state
        .sync_payment
        .handle(SyncPaymentCommand {
            payment_id: PaymentId::new(id),
        })
        .await?;

    Ok(Json(SyncResponse {
        message: "Payment synchronized successfully".to_string(),
        mercado_pago: GatewayViewDto::from(&result.gateway),
        local: result.record,
        synchronized: result.synchronized,
    }))
}

/// `GET /api/payments` - Filtered listing, newest first, capped.
pub async fn list_payments(
    State(state): State<PaymentAppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ListPaymentsParams>,
) -> Result<Json<ListPaymentsResponse>, PaymentApiError> {
    let status = params.status_filter();
    let payments = state
        .list_payments
        .handle(ListPaymentsQuery {
            payer_email: params.email.filter(|e| !e.is_empty()),
            status,
        })
        .await?;

    Ok(Json(ListPaymentsResponse {
        total: payments.len(),
        payments,
    }))
}

/// `POST /api/webhooks/mercadopago` - Gateway notification intake.
///
/// No authentication: the gateway does not sign PIX notifications, so the
/// handler trusts nothing in the body and re-fetches the payment detail
/// before acting. Every outcome except a failed detail fetch returns 200,
/// because a non-2xx invites the gateway to redeliver.
pub async fn handle_gateway_webhook(
    State(state): State<PaymentAppState>,
    Json(notification): Json<WebhookNotification>,
) -> Response {
    match state.process_webhook.handle(notification).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "webhook processed");
            // Plain text ack; the gateway only inspects the status code.
            (StatusCode::OK, "Webhook processed successfully").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "webhook processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to process notification",
                    "code": "WEBHOOK_ERROR"
                })),
            )
                .into_response()
        }
    }
}
