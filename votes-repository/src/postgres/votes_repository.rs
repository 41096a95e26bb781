use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use votes_shared::types::{
    LedgerOp, TargetKind, TargetRef, UserId, UserVote, VoteCounts, VoteDirection, VoteState,
    VotesCount, transition,
};
use crate::{VotesRepository, VotesRepositoryError};

/// PostgreSQL implementation of the vote ledger.
///
/// ## Features
///
/// - Connection pooling with `sqlx::PgPool`
/// - Automatic transaction wrapping for the toggle write
/// - Efficient batch count queries using `UNNEST`
pub struct PostgresVotesRepository {
    pool: sqlx::PgPool,
}

impl PostgresVotesRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with required schema
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, VotesRepositoryError> {
        Ok(Self { pool })
    }

    /// Reads and locks the current ledger row within an active transaction.
    ///
    /// A missing row takes no lock, so two first votes can race. The loser of
    /// that race fails on the unique key when inserting.
    async fn current_direction_tx(
        &self,
        voter_id: UserId,
        target: TargetRef,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<VoteDirection>, VotesRepositoryError> {
        let value: Option<i16> = sqlx::query_scalar(
            r#"
            SELECT value
            FROM votes
            WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3
            FOR UPDATE
            "#,
        )
        .bind(voter_id)
        .bind(target.kind.tag())
        .bind(target.id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(value.map(VoteDirection::from_value).transpose()?)
    }

    /// Executes a computed ledger operation within an active transaction.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Row written or removed
    /// * `Err(VotesRepositoryError::Conflict)` - Unique key already taken
    async fn write_op_tx(
        &self,
        voter_id: UserId,
        target: TargetRef,
        op: LedgerOp,
        voted_at: DateTime<Utc>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), VotesRepositoryError> {
        let key = format!("voter {} on {}", voter_id, target);
        let result = match op {
            LedgerOp::Insert(direction) => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (voter_id, target_kind, target_id, value, voted_at)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(voter_id)
                .bind(target.kind.tag())
                .bind(target.id)
                .bind(direction.value())
                .bind(voted_at)
                .execute(&mut **tx)
                .await
            }
            LedgerOp::Update(direction) => {
                sqlx::query(
                    r#"
                    UPDATE votes
                    SET value = $4, voted_at = $5
                    WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3
                    "#,
                )
                .bind(voter_id)
                .bind(target.kind.tag())
                .bind(target.id)
                .bind(direction.value())
                .bind(voted_at)
                .execute(&mut **tx)
                .await
            }
            LedgerOp::Delete => {
                sqlx::query(
                    r#"
                    DELETE FROM votes
                    WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3
                    "#,
                )
                .bind(voter_id)
                .bind(target.kind.tag())
                .bind(target.id)
                .execute(&mut **tx)
                .await
            }
        };

        result
            .map(|_| ())
            .map_err(|e| VotesRepositoryError::from_write(e, key))
    }
}

#[async_trait]
impl VotesRepository for PostgresVotesRepository {
    /// Applies the toggle rule in a new transaction.
    ///
    /// Either the whole read-compute-write commits or nothing does, so a
    /// request cancelled mid-flight leaves the previous state in place.
    async fn apply_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
        direction: VoteDirection,
        voted_at: DateTime<Utc>,
    ) -> Result<VoteState, VotesRepositoryError> {
        let mut tx = self.pool.begin().await?;
        let current = self.current_direction_tx(voter_id, target, &mut tx).await?;
        let op = transition(current, direction);
        self.write_op_tx(voter_id, target, op, voted_at, &mut tx).await?;
        tx.commit()
            .await
            .map_err(|e| VotesRepositoryError::from_write(e, format!("voter {} on {}", voter_id, target)))?;
        Ok(op.resulting_state())
    }

    async fn get_user_vote(
        &self,
        voter_id: UserId,
        target: TargetRef,
    ) -> Result<Option<UserVote>, VotesRepositoryError> {
        let row: Option<(i16, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT value, voted_at
            FROM votes
            WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3
            "#,
        )
        .bind(voter_id)
        .bind(target.kind.tag())
        .bind(target.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((value, voted_at)) => Ok(Some(UserVote {
                voter_id,
                target,
                direction: VoteDirection::from_value(value)?,
                voted_at,
            })),
            None => Ok(None),
        }
    }

    /// Counts votes grouped by value for a batch of targets.
    ///
    /// Uses PostgreSQL's UNNEST with a LEFT JOIN so targets without any vote
    /// still come back with zero counts.
    async fn get_vote_counts(
        &self,
        targets: &[TargetRef],
    ) -> Result<Vec<VotesCount>, VotesRepositoryError> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::with_capacity(targets.len());
        let unique: Vec<TargetRef> = targets.iter().copied().filter(|t| seen.insert(*t)).collect();
        let kinds: Vec<i16> = unique.iter().map(|t| t.kind.tag()).collect();
        let ids: Vec<i64> = unique.iter().map(|t| t.id).collect();

        let rows: Vec<(i16, i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT t.kind,
                   t.id,
                   COUNT(v.id) FILTER (WHERE v.value = 1)  AS upvotes,
                   COUNT(v.id) FILTER (WHERE v.value = -1) AS downvotes
            FROM UNNEST($1::smallint[], $2::bigint[]) AS t(kind, id)
            LEFT JOIN votes v ON v.target_kind = t.kind AND v.target_id = t.id
            GROUP BY t.kind, t.id
            "#,
        )
        .bind(kinds)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = Vec::with_capacity(rows.len());
        for (kind, id, upvotes, downvotes) in rows {
            counts.push(VotesCount {
                target: TargetRef::new(TargetKind::from_tag(kind)?, id),
                counts: VoteCounts::new(upvotes, downvotes),
            });
        }

        Ok(counts)
    }

    /// Checks if the tables are created in the database.
    async fn check_tables_created(&self) -> Result<bool, VotesRepositoryError> {
        let tables = ["votes", "posts", "comments"];
        for table in tables {
            let table_exists: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)
                "#,
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
            if !table_exists {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
