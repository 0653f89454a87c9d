//! Web server module for handling Discord interactions.
//!
//! This module provides a thin web server that:
//! - Receives interaction webhooks from Discord
//! - Verifies the Ed25519 request signature
//! - Dispatches the interaction and returns the response inline
//!
//! Verification and dispatch live in [`crate::verify`] and [`crate::dispatch`];
//! this module only adapts them to HTTP.

pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, interactions_webhook, AppState, HealthResponse};

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/interactions", post(interactions_webhook))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
