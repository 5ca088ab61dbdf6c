//! # Huddle Gateway Crate
//!
//! HTTP and WebSocket surface of the chat backend. REST handlers persist
//! through the chat services and then fan events out to the connections
//! registered in [`Rooms`] for that chat.
//!
//! ## Architecture
//!
//! - **REST**: chat, participant and message endpoints
//! - **WebSocket**: upgrade, path routing and the per-chat room registry
//! - **Uploads**: local file storage for message attachments
//! - **Middleware**: request logging
//!
//! ## Usage
//!
//! ```rust,no_run
//! use huddle_gateway::{create_gateway_state, create_router};
//!
//! # async fn run(pool: sqlx::SqlitePool, config: huddle_config::AppConfig) -> anyhow::Result<()> {
//! let state = create_gateway_state(pool, &config).await?;
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod uploads;
pub mod websocket;

// Re-export main types for convenience
pub use error::{GatewayError, GatewayResult};
pub use state::{create_gateway_state, GatewayState};
pub use uploads::UploadStore;
pub use websocket::Rooms;

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Room left in the body limit for the text fields next to the file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let body_limit = state.uploads.max_file_bytes().saturating_add(FORM_OVERHEAD_BYTES);
    let public_path = state.uploads.public_path().to_string();
    let files = ServeDir::new(state.uploads.directory());

    Router::new()
        .merge(rest::create_rest_routes())
        .merge(websocket::create_websocket_routes())
        .fallback(websocket::fallback_handler)
        .with_state(Arc::new(state))
        .nest_service(&public_path, files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
