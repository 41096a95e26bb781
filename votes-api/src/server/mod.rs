// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tracing::info;

use self::state::AppState;
use crate::config::create_cors_layer;
use crate::errors::AppError;

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/votes", post(handlers::cast_vote))
        .route("/scores/:kind/:id", get(handlers::get_score))
        .route("/rankings/:kind", get(handlers::get_rankings))
        .route("/health", get(handlers::health_check))
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Server listening on {}", addr);
    info!("- Vote endpoint: http://{}/votes", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
