//! HTTP read API.
//!
//! Every route is served both at the root and under `/api`:
//! - `GET /weather` - paginated raw observations
//! - `GET /weather/stats` - paginated yearly station statistics
//! - `GET /health` - liveness check
//! - `GET /openapi.json` and `GET /docs` - API description

pub mod handlers;
pub mod openapi;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::Database;
use crate::error::Result;

pub use handlers::ApiError;

/// Shared state for request handlers.
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Arc<Self> {
        Arc::new(Self { db })
    }
}

fn routes() -> Router {
    Router::new()
        .route("/weather", get(handlers::weather_handler))
        .route("/weather/stats", get(handlers::stats_handler))
        .route("/health", get(handlers::health_handler))
        .route("/openapi.json", get(openapi::openapi_handler))
        .route("/docs", get(openapi::docs_handler))
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `listen_addr` and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, listen_addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(addr = %listener.local_addr()?, "Starting weather API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
