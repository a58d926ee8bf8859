//! Service entrypoint: configuration, wiring, and the axum server loop.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pix_access::adapters::auth::{
    IdpConfig, IdpVerifier, LocalJwtConfig, LocalJwtVerifier, VerifierChain,
};
use pix_access::adapters::http::middleware::auth_middleware;
use pix_access::adapters::http::payment::{payment_router, PaymentAppState};
use pix_access::adapters::mercadopago::{MercadoPagoClient, MercadoPagoConfig};
use pix_access::adapters::postgres::{
    PostgresEntitlementRepository, PostgresPaymentRepository, PostgresPaymentUserMapRepository,
    PostgresUserDirectory,
};
use pix_access::application::handlers::payment::{
    CreatePaymentHandler, GetPaymentHandler, ListPaymentsHandler, ProcessWebhookHandler,
    SyncPaymentHandler,
};
use pix_access::config::AppConfig;
use pix_access::domain::payment::WebhookReconciler;
use pix_access::ports::TokenVerifier;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("pix-access exited with error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.server.log_level)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        "starting pix-access"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!("database connection established");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("migrations applied");
    }

    // Gateway and persistence adapters.
    let gateway = Arc::new(MercadoPagoClient::new(
        MercadoPagoConfig::new(config.gateway.access_token.clone())
            .with_base_url(config.gateway.api_base_url.clone())
            .with_timeout(config.gateway.timeout()),
    )?);
    let payments = Arc::new(PostgresPaymentRepository::new(pool.clone()));
    let user_map = Arc::new(PostgresPaymentUserMapRepository::new(pool.clone()));
    let entitlements = Arc::new(PostgresEntitlementRepository::new(pool.clone()));
    let users = Arc::new(PostgresUserDirectory::new(pool.clone()));

    let reconciler = Arc::new(WebhookReconciler::new(
        gateway.clone(),
        payments.clone(),
        user_map.clone(),
        entitlements,
        users,
    ));

    let state = PaymentAppState {
        create_payment: Arc::new(CreatePaymentHandler::new(gateway.clone(), user_map)),
        get_payment: Arc::new(GetPaymentHandler::new(gateway.clone(), payments.clone())),
        sync_payment: Arc::new(SyncPaymentHandler::new(gateway.clone(), payments.clone())),
        list_payments: Arc::new(ListPaymentsHandler::new(payments)),
        process_webhook: Arc::new(ProcessWebhookHandler::new(reconciler)),
    };

    // Local HS256 tokens first, IdP RS256 as fallback when configured.
    let mut verifiers: Vec<Arc<dyn TokenVerifier>> = vec![Arc::new(LocalJwtVerifier::new(
        LocalJwtConfig::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_issuer.clone(),
            config.auth.jwt_audience.clone(),
        ),
    ))];
    if config.auth.idp_enabled() {
        let issuer = config.auth.idp_issuer_url.clone().unwrap_or_default();
        let audience = config
            .auth
            .idp_audience
            .clone()
            .unwrap_or_else(|| config.auth.jwt_audience.clone());
        verifiers.push(Arc::new(IdpVerifier::new(
            IdpConfig::new(issuer, audience)
                .with_cache_duration(config.auth.jwks_cache_ttl()),
        )));
        tracing::info!("identity provider token verification enabled");
    }
    let verifier: Arc<dyn TokenVerifier> = Arc::new(VerifierChain::new(verifiers));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", payment_router())
        .with_state(state)
        .layer(axum::middleware::from_fn_with_state(
            verifier,
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(build_cors(&config));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

fn build_cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}
