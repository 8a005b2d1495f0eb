//! Cartwright API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::Router;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cartwright_api::error::AppError;
use cartwright_api::{routes, state};
use cartwright_cart::repository::CartRepository;
use cartwright_core::catalog::ProductCatalog;
use cartwright_core::clock::{Clock, SystemClock};
use cartwright_store::pg_cart_repository::PgCartRepository;
use cartwright_store::pg_product_catalog::PgProductCatalog;
use cartwright_sweeper::{Sweeper, SweeperConfig};

fn env_i64(name: &str, default: i64) -> Result<i64, AppError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("{name} must be an integer: {e}"))),
        Err(_) => Ok(default),
    }
}

fn sweeper_config_from_env() -> Result<SweeperConfig, AppError> {
    let defaults = SweeperConfig::default();
    Ok(SweeperConfig {
        abandon_after: Duration::hours(env_i64("CART_ABANDON_AFTER_HOURS", 3)?),
        remove_after: Duration::days(env_i64("CART_REMOVE_AFTER_DAYS", 7)?),
        batch_size: env_i64("SWEEP_BATCH_SIZE", defaults.batch_size)?,
        tick_interval: StdDuration::from_secs(
            u64::try_from(env_i64("SWEEP_INTERVAL_SECS", 30 * 60)?)
                .map_err(|_| AppError::Config("SWEEP_INTERVAL_SECS must be positive".into()))?,
        ),
    })
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Cartwright API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let sweeper_config = sweeper_config_from_env()?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    // Build shared collaborators.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repo: Arc<dyn CartRepository> = Arc::new(PgCartRepository::new(pool.clone()));
    let catalog: Arc<dyn ProductCatalog> = Arc::new(PgProductCatalog::new(pool));

    // The sweeper runs on its own timer for the lifetime of the server.
    let sweeper = Sweeper::new(repo.clone(), clock.clone(), sweeper_config);
    tokio::spawn(async move {
        sweeper.run_on_interval().await;
    });

    let app_state = state::AppState::new(clock, repo, catalog);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/carts", routes::carts::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
