//! Router configuration for the Telephony Server API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Metrics
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/stats", get(handlers::stats))
        // Call initiation
        .route("/call", post(handlers::make_call))
        .route("/demo_call", post(handlers::demo_call))
        // Twilio callbacks
        .route("/twilio_callback", post(handlers::twilio_callback))
        .route("/demo_twilio_callback", post(handlers::demo_twilio_callback))
        .with_state(state)
}
