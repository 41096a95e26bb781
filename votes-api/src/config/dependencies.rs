//! Dependency initialization and wiring for the votes API.
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use votes_repository::{
    InMemoryTargetsRepository, InMemoryVotesRepository, MIGRATOR, PostgresTargetsRepository,
    PostgresVotesRepository, TargetsRepository, VotesRepository,
};
use votes_service::notifier::ChannelNotifier;
use votes_service::{MutationGateway, ScoreAggregator, VoteLedger};
use votes_shared::types::{Target, VoteEvent};

use super::settings::{StorageBackend, VotesConfig};
use crate::auth::JwtValidator;
use crate::errors::AppError;
use crate::server::state::AppState;

/// `Dependencies` holds the components the votes API is built from.
pub struct Dependencies {
    pub config: VotesConfig,
    pub state: AppState,
    /// Receiving end of the notification queue, drained by the worker.
    pub notifications: mpsc::Receiver<VoteEvent>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - Invalid configuration or an unreachable database
    pub async fn new() -> Result<Self, AppError> {
        let config = VotesConfig::from_env()?;
        Self::from_config(config).await
    }

    /// Wires repositories, the voting core and the HTTP state from `config`.
    pub async fn from_config(config: VotesConfig) -> Result<Self, AppError> {
        info!(
            storage = ?config.storage,
            bind_addr = %config.bind_addr,
            notification_queue_capacity = config.notification_queue_capacity,
            "Initializing dependencies"
        );

        let jwt_validator = JwtValidator::new(&config.jwt_secret)?;
        let (votes_repository, targets_repository) = Self::repositories(&config).await?;

        let (notifier, notifications) = ChannelNotifier::channel(config.notification_queue_capacity);

        let gateway = MutationGateway::new(
            VoteLedger::new(votes_repository.clone()),
            ScoreAggregator::new(votes_repository, targets_repository.clone()),
            targets_repository,
            Some(Arc::new(notifier)),
        );

        Ok(Dependencies {
            config,
            state: AppState {
                gateway: Arc::new(gateway),
                jwt_validator: Arc::new(jwt_validator),
            },
            notifications,
        })
    }

    async fn repositories(
        config: &VotesConfig,
    ) -> Result<(Arc<dyn VotesRepository>, Arc<dyn TargetsRepository>), AppError> {
        match config.storage {
            StorageBackend::Memory => {
                let targets = InMemoryTargetsRepository::new();
                if let Some(seed) = &config.memory_seed {
                    for target in load_seed(seed)? {
                        targets.insert(target).await;
                    }
                }
                info!(targets = targets.len().await, "Using in-memory storage");
                Ok((Arc::new(InMemoryVotesRepository::new()), Arc::new(targets)))
            }
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| AppError::config("DATABASE_URL must be set"))?;

                let pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(database_url)
                    .await?;

                if config.run_migrations {
                    MIGRATOR.run(&pool).await?;
                    info!("Database migrations applied");
                }

                let votes_repository = PostgresVotesRepository::new(pool.clone()).await?;
                if !votes_repository.check_tables_created().await? {
                    return Err(AppError::config(
                        "votes tables are missing, run the migrations or set RUN_MIGRATIONS=true",
                    ));
                }
                let targets_repository = PostgresTargetsRepository::new(pool)
                    .await
                    .map_err(|e| AppError::config(format!("Failed to create targets repository: {}", e)))?;

                info!("PostgreSQL storage ready");
                Ok((Arc::new(votes_repository), Arc::new(targets_repository)))
            }
        }
    }
}

/// Reads a JSON array of targets for the memory backend.
fn load_seed(path: &Path) -> Result<Vec<Target>, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::config(format!("Invalid targets in {}: {}", path.display(), e)))
}
