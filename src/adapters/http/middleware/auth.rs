//! Authentication middleware and extractor for axum.
//!
//! - `auth_middleware` - validates Bearer tokens and injects the user into
//!   request extensions
//! - `RequireAuth` - extractor that requires an authenticated user
//!
//! The middleware depends only on the `TokenVerifier` port, so the same
//! layer serves the local-token verifier, the identity provider verifier,
//! or the chain of both.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      |
//!                              Handler → RequireAuth reads from extensions
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::TokenVerifier;

/// Auth middleware state - the verifier (usually a chain).
pub type AuthState = Arc<dyn TokenVerifier>;

/// Validates the `Authorization: Bearer <token>` header.
///
/// On success the `AuthenticatedUser` lands in request extensions. A
/// missing header passes through untouched so public routes under the
/// same layer keep working; handlers opt in to enforcement with
/// `RequireAuth`. An invalid token is rejected here with 401.
pub async fn auth_middleware(
    State(verifier): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match verifier.verify(token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!(error = %msg, "auth service unavailable");
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                (
                    status,
                    Json(serde_json::json!({
                        "error": message,
                        "code": "AUTH_ERROR"
                    })),
                )
                    .into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires authentication.
///
/// Returns 401 when the auth middleware did not validate a token for this
/// request.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockTokenVerifier;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new("user-123", "test@example.com")
    }

    // ════════════════════════════════════════════════════════════════════════════
    // RequireAuth Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_auth_extracts_user_from_extensions() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        let mut request: Request<()> = Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(test_user());

        let (mut parts, _body) = request.into_parts();
        let result: Result<RequireAuth, AuthRejection> =
            RequireAuth::from_request_parts(&mut parts, &()).await;

        let RequireAuth(user) = result.unwrap();
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn require_auth_fails_without_user() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        let request: Request<()> = Request::builder().uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result: Result<RequireAuth, AuthRejection> =
            RequireAuth::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Behaviour Tests
    // ════════════════════════════════════════════════════════════════════════════

    async fn echo_auth(request: Request) -> Response {
        match request.extensions().get::<AuthenticatedUser>() {
            Some(user) => (StatusCode::OK, user.email.clone()).into_response(),
            None => (StatusCode::OK, "anonymous").into_response(),
        }
    }

    fn app(verifier: Arc<dyn TokenVerifier>) -> axum::Router {
        use axum::{middleware, routing::get};
        axum::Router::new()
            .route("/probe", get(echo_auth))
            .layer(middleware::from_fn_with_state(verifier, auth_middleware))
    }

    #[tokio::test]
    async fn valid_token_injects_the_user() {
        use tower::ServiceExt;

        let app = app(Arc::new(MockTokenVerifier::accepting(
            "user-123",
            "test@example.com",
        )));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .header("Authorization", "Bearer any")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"test@example.com");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_with_401() {
        use tower::ServiceExt;

        let app = app(Arc::new(MockTokenVerifier::rejecting()));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .header("Authorization", "Bearer bad")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn verifier_outage_is_503_not_401() {
        use tower::ServiceExt;

        let app = app(Arc::new(MockTokenVerifier::unavailable()));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .header("Authorization", "Bearer any")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn missing_header_passes_through_anonymously() {
        use tower::ServiceExt;

        let app = app(Arc::new(MockTokenVerifier::rejecting()));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"anonymous");
    }
}
