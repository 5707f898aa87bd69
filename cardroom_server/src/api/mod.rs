//! HTTP/WebSocket API surface.

pub mod websocket;

use std::sync::Arc;

use axum::{Router, routing::get};
use cardroom::RoomRegistry;
use tower_http::cors::CorsLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
}

/// Build the router: one WebSocket endpoint carries the whole command
/// surface, plus a trivial health probe.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(websocket::websocket_handler))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
