//! PostgreSQL implementation of the targets repository.
//!
//! Reads the `posts` and `comments` read-models to answer existence,
//! authorship and creation time questions.
use crate::TargetsRepository;
use crate::errors::TargetsRepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use votes_shared::types::{Target, TargetKind, TargetRef};

/// PostgreSQL-backed targets repository.
pub struct PostgresTargetsRepository {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
}

impl PostgresTargetsRepository {
    /// Creates a new PostgreSQL targets repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the posts and comments tables
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, TargetsRepositoryError> {
        Ok(Self { pool })
    }
}

fn table_for(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Post => "posts",
        TargetKind::Comment => "comments",
    }
}

#[async_trait]
impl TargetsRepository for PostgresTargetsRepository {
    async fn get_target(&self, target: TargetRef) -> Result<Option<Target>, TargetsRepositoryError> {
        let sql = format!(
            "SELECT author_id, created_at FROM {} WHERE id = $1",
            table_for(target.kind)
        );
        let row: Option<(i64, DateTime<Utc>)> = sqlx::query_as(&sql)
            .bind(target.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(author_id, created_at)| Target {
            target,
            author_id,
            created_at,
        }))
    }

    async fn list_targets(&self, kind: TargetKind) -> Result<Vec<Target>, TargetsRepositoryError> {
        let sql = format!("SELECT id, author_id, created_at FROM {}", table_for(kind));
        let rows: Vec<(i64, i64, DateTime<Utc>)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, author_id, created_at)| Target {
                target: TargetRef::new(kind, id),
                author_id,
                created_at,
            })
            .collect())
    }
}
