//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `auth::AuthError` and `kernel::error::AppError`.

mod config;

use auth::{InMemoryAccountRepository, PgAccountRepository, auth_router, auth_router_generic};
use axum::{
    Router, http,
    http::{Method, header},
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Account store: Postgres when configured, otherwise process memory
    let pg_store = match &config.database_url {
        Some(database_url) => {
            let repo = PgAccountRepository::connect(database_url, config.db_max_connections).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(repo.pool())
                .await?;
            tracing::info!("Migrations completed");

            Some(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
            None
        }
    };

    let auth_routes = match &pg_store {
        Some(repo) => auth_router(repo.clone(), config.auth.clone()),
        None => auth_router_generic(InMemoryAccountRepository::new(), config.auth.clone()),
    };

    // CORS configuration (cookies need credentials and explicit origins)
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        domain = %config.auth.domain,
        production = config.production,
        "Listening"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(repo) = pg_store {
        repo.close().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
