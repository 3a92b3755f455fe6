//! # shiptrack-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to a configurable port (default
//! 8080). Persists to PostgreSQL when `DATABASE_URL` is set; otherwise
//! runs against the in-memory store.

use std::sync::Arc;

use shiptrack_api::state::{AppConfig, AppState};
use shiptrack_api::store::memory::MemoryStore;
use shiptrack_api::store::postgres::PgStore;
use shiptrack_api::store::ShipmentStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let config = AppConfig { port };

    // Select the store: PostgreSQL when configured, in-memory otherwise.
    let store: Arc<dyn ShipmentStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url).await.map_err(|e| {
                tracing::error!("Database initialization failed: {e}");
                e
            })?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running with the in-memory store. \
                 Shipments will not survive restarts."
            );
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::with_store(store, config);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = shiptrack_api::app(state);

    tracing::info!("Shiptrack API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
