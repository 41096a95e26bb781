//! Configuration module for the votes API.
//! Reads settings from the environment and wires the application dependencies.
mod dependencies;
mod settings;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

pub use dependencies::Dependencies;
pub use settings::{StorageBackend, VotesConfig};

/// Create CORS layer for the browser front-ends
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
