//! Votes API Main Entry Point
//!
//! Serves the vote, score and ranking endpoints and drains the vote
//! notification queue in the background.

use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use votes_api::server::{create_app, run_server};
use votes_api::{AppError, Dependencies};
use votes_service::notifier::{LogNotificationSink, run_notification_worker};

/// Installs the global subscriber. `LOG_FORMAT=json` switches from the
/// compact console lines to one JSON object per event.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("votes_api=info,votes_service=info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_current_span(false)))
        .with((!json).then(|| fmt::layer().compact()))
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_format = if json { "json" } else { "console" },
        "Logging ready"
    );
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting votes API");

    let dependencies = match Dependencies::new().await {
        Ok(dependencies) => {
            info!("Dependencies initialized successfully");
            dependencies
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    tokio::spawn(run_notification_worker(
        dependencies.notifications,
        Arc::new(LogNotificationSink),
    ));

    let app = create_app(dependencies.state);
    if let Err(e) = run_server(app, dependencies.config.bind_addr).await {
        error!(error = %e, "Server stopped with an error");
        return Err(e);
    }
    Ok(())
}
