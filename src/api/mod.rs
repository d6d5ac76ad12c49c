mod error;
mod rest;
mod types;
mod websocket;

pub use error::{ApiError, ApiResult};
pub use rest::{RestApi, DEFAULT_HISTORY_LIMIT};
pub use types::*;
pub use websocket::websocket_handler;

use crate::engine::LinkEngine;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create a complete API server with REST and WebSocket support
pub fn create_api_server(engine: LinkEngine) -> Router {
    let rest_api = RestApi::new(engine.clone());

    // Configure CORS to allow dashboard requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ws_router = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(engine);

    Router::new()
        .merge(rest_api.router())
        .merge(ws_router)
        .route("/metrics", crate::metrics::metrics_route())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
