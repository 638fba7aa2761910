//! API Server Entry Point
//!
//! Loads configuration, prepares the database and the external clients, then
//! serves the application until SIGINT/SIGTERM. Startup failures use
//! `anyhow`; request-level errors are `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use api::app::{AppState, HttpSettings, build_router};
use api::config::AppConfig;
use api::telemetry;
use auth::{
    AuthAppState, BcryptPasswordHasher, JwtTokenService, PgUserRepository,
    RandomPasswordGenerator, SesPasswordResetMailer,
};
use catalog::{CatalogAppState, PgBookRepository, S3ObjectStorage};
use platform::aws::{S3Client, SesClient};
use platform::stripe::{StripeClient, WebhookVerifier};
use shop::{PgOrderRepository, ShopAppState, StripePaymentGateway};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(&config.env, &config.log_level);

    tracing::info!(env = %config.env, port = config.port, "Starting api");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("could not connect to the database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // External clients
    let sdk = platform::aws::load_sdk_config(
        &config.aws.region,
        config.aws.endpoint_url.as_deref(),
    )
    .await;
    let s3 = S3Client::new(&sdk, config.aws.s3_bucket.clone());
    let ses = SesClient::new(&sdk, config.aws.ses_source_email.clone());

    let http = reqwest::Client::builder()
        .user_agent(concat!("api/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("could not build the HTTP client")?;
    let stripe = StripeClient::new(http, config.stripe.api_key.clone());

    // Adapters
    let auth_config = config.auth();
    let storage = Arc::new(S3ObjectStorage::new(s3));
    let books = Arc::new(PgBookRepository::new(pool.clone()));

    let state = AppState {
        auth: AuthAppState {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            mailer: Arc::new(SesPasswordResetMailer::new(
                ses,
                auth_config.reset_email_subject.clone(),
            )),
            hasher: Arc::new(BcryptPasswordHasher::new(auth_config.bcrypt_cost)),
            tokens: Arc::new(JwtTokenService::new(
                &auth_config.jwt_secret,
                auth_config.jwt_ttl,
            )),
            passwords: Arc::new(RandomPasswordGenerator::new(
                auth_config.reset_password_length,
            )),
        },
        catalog: CatalogAppState {
            books: books.clone(),
            storage: storage.clone(),
            config: config.catalog(),
        },
        shop: ShopAppState {
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            books,
            storage,
            payments: Arc::new(StripePaymentGateway::new(
                stripe,
                WebhookVerifier::new(config.stripe.webhook_secret.clone()),
                config.stripe.currency.clone(),
            )),
            config: config.shop(),
        },
    };

    let app = build_router(state, &HttpSettings::from(&config));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Could not listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
