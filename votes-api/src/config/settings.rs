//! Environment-driven settings.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

use crate::errors::AppError;

/// Default HTTP listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default size of the notification queue.
const DEFAULT_NOTIFICATION_QUEUE_CAPACITY: usize = 1024;

/// Default PostgreSQL pool size.
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Where the ledger and the target read-models live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local maps, for local runs without a database. Targets come
    /// from the `VOTES_MEMORY_SEED` file, if any.
    Memory,
}

impl StorageBackend {
    /// Parse the backend from `VOTES_STORAGE`.
    ///
    /// Valid values: "postgres" or "memory" (case-insensitive).
    /// Defaults to "postgres" if not set or invalid.
    fn from_env() -> Self {
        match env::var("VOTES_STORAGE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => Self::Postgres,
            "memory" | "in-memory" => Self::Memory,
            _ => {
                warn!("Invalid VOTES_STORAGE, defaulting to 'postgres'");
                Self::Postgres
            }
        }
    }
}

/// Settings of the votes API process.
#[derive(Debug, Clone)]
pub struct VotesConfig {
    pub storage: StorageBackend,
    /// Set whenever `storage` is `Postgres`.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub notification_queue_capacity: usize,
    /// JSON array of targets loaded into the memory backend at startup.
    pub memory_seed: Option<PathBuf>,
}

impl VotesConfig {
    /// Reads the settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VOTES_STORAGE`: "postgres" or "memory" (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL URL, required for the postgres backend
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: true)
    /// - `BIND_ADDR`: HTTP listen address (default: 0.0.0.0:8080)
    /// - `JWT_SECRET`: HS256 secret, required
    /// - `NOTIFICATION_QUEUE_CAPACITY`: Notification queue size (default: 1024)
    /// - `VOTES_MEMORY_SEED`: Targets file for the memory backend (optional)
    ///
    /// # Returns
    ///
    /// * `Ok(VotesConfig)` - Parsed settings
    /// * `Err(AppError::Config)` - A required variable is missing or unparsable
    pub fn from_env() -> Result<Self, AppError> {
        let storage = StorageBackend::from_env();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(AppError::config("DATABASE_URL must be set"));
        }

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::config("JWT_SECRET must be set"))?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::config(format!("Invalid BIND_ADDR: {}", e)))?;

        Ok(Self {
            storage,
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS),
            run_migrations: parse_or("RUN_MIGRATIONS", true),
            bind_addr,
            jwt_secret,
            notification_queue_capacity: parse_or(
                "NOTIFICATION_QUEUE_CAPACITY",
                DEFAULT_NOTIFICATION_QUEUE_CAPACITY,
            ),
            memory_seed: env::var("VOTES_MEMORY_SEED")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}
