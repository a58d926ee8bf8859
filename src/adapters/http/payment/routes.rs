//! Route definitions for the payment API.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    self, PaymentAppState,
};

/// Authenticated payment endpoints.
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/", post(handlers::create_payment).get(handlers::list_payments))
        .route("/:id", get(handlers::get_payment))
        .route("/:id/sync", post(handlers::sync_payment))
}

/// Gateway notification intake. Mounted without the auth requirement:
/// the gateway cannot present a bearer token.
pub fn webhook_routes() -> Router<PaymentAppState> {
    Router::new().route("/mercadopago", post(handlers::handle_gateway_webhook))
}

/// Full payment surface, ready to nest under the API prefix.
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .nest("/payments", payment_routes())
        .nest("/webhooks", webhook_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_routes_compose() {
        let _router: Router<PaymentAppState> = payment_routes();
        let _webhooks: Router<PaymentAppState> = webhook_routes();
        let _full: Router<PaymentAppState> = payment_router();
    }
}
