//! HTTP surface: signed persona questions and file uploads.

use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_config::{AppConfig, ConfigError};
pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use axum::{Router, extract::DefaultBodyLimit, routing::post};
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{error, info};

use crate::routes::{ask::ask_route::ask, upload::upload_route::upload_file};

/// Router with every route, the body limit and CORS applied.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            state.config.cors_allowed_origins.iter().cloned(),
        ))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/upload_file", post(upload_file))
        .route("/{persona}", post(ask))
        .layer(DefaultBodyLimit::max(state.config.upload_max_bytes))
        .layer(cors)
        .with_state(state)
}

pub async fn start(state: Arc<AppState>) -> Result<(), AppError> {
    let address = state.config.api_address.clone();
    info!(personas = ?state.personas(), "starting api");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed. If the handler cannot be installed the
/// server keeps running until killed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
