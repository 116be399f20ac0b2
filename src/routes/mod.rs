//! HTTP routes for the chat gateway
//!
//! This module defines all HTTP endpoints exposed by the service.

pub mod chat;
pub mod health;
pub mod metrics;
pub mod root;
pub mod tools;

use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::{error::AppError, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root::service_info))
        .route("/health", get(health::health_check))
        .route("/mcp/tools", get(tools::list_tools))
        .route("/mcp/tools/:name/call", post(tools::call_tool))
        .route("/api/chat", post(chat::chat))
        .route("/metrics", get(metrics::prometheus_metrics))
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Outermost: a panicking handler still answers with the error envelope
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected internal failure".to_string()
    };

    error!(error = %message, "Request handler panicked");
    AppError::Internal(anyhow::anyhow!(message)).into_response()
}
