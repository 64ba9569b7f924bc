//! HTTP application assembly

pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;

use crate::config::{Config, StoreBackend};
use crate::db::{self, DbConfig};
use crate::features::{self, FeatureState};
use crate::middleware;
use crate::store::{MemoryCatalogStore, PgCatalogStore, SharedStore};
use response::ErrorResponse;

/// Connect the configured store backend, applying migrations for Postgres
pub async fn build_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.catalog.store {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&DbConfig::from(&config.database)).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgCatalogStore::new(pool)))
        },
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryCatalogStore::new()))
        },
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let health = Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone());

    Router::new()
        .merge(health)
        .merge(features::router(state))
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Bind, serve and shut down gracefully on Ctrl+C or SIGTERM
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = build_store(&config).await?;
    let state = FeatureState::new(store, &config.catalog);
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Health check handler
async fn health_check(State(state): State<FeatureState>) -> Response {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "store": "connected"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Store health check failed: {:?}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("UNAVAILABLE", "Store is unreachable")),
            )
                .into_response()
        },
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    tracing::info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
