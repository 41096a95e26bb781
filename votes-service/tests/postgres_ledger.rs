//! Integration tests for the vote ledger over PostgreSQL.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! with the repository's migrator. Each race goes through `VoteLedger`, so a
//! lost first insert is absorbed by its retry instead of reaching the caller.

use std::sync::Arc;

use votes_repository::{PostgresTargetsRepository, PostgresVotesRepository, VotesRepository};
use votes_service::gateway::{MutationGateway, VoteRequest};
use votes_service::{ScoreAggregator, VoteLedger};
use votes_shared::types::{TargetRef, UserId, VoteDirection, VoteState};

async fn insert_post(pool: &sqlx::PgPool, author_id: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO posts (author_id) VALUES ($1) RETURNING id")
        .bind(author_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn ledger_rows(pool: &sqlx::PgPool, voter_id: UserId, target: TargetRef) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM votes WHERE voter_id = $1 AND target_kind = $2 AND target_id = $3",
    )
    .bind(voter_id)
    .bind(target.kind.tag())
    .bind(target.id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Runs two votes by the same voter concurrently and returns both states.
async fn race(
    ledger: &Arc<VoteLedger>,
    voter_id: UserId,
    target: TargetRef,
    first: VoteDirection,
    second: VoteDirection,
) -> (VoteState, VoteState) {
    let a = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.apply_vote(voter_id, target, first).await })
    };
    let b = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.apply_vote(voter_id, target, second).await })
    };
    (a.await.unwrap().unwrap(), b.await.unwrap().unwrap())
}

#[sqlx::test(migrator = "votes_repository::MIGRATOR")]
async fn test_racing_first_votes_settle_without_conflict(pool: sqlx::PgPool) {
    let repository = Arc::new(PostgresVotesRepository::new(pool.clone()).await.unwrap());
    let ledger = Arc::new(VoteLedger::new(repository.clone()));
    let post = TargetRef::post(insert_post(&pool, 1).await);

    for voter_id in 1..=20 {
        let (a, b) = race(&ledger, voter_id, post, VoteDirection::Up, VoteDirection::Up).await;

        // Whichever commits second toggles the first one off
        let mut states = [a, b];
        states.sort_by_key(|s| s.to_string());
        assert_eq!(states, [VoteState::None, VoteState::Up], "voter {voter_id}");
        assert_eq!(ledger_rows(&pool, voter_id, post).await, 0);
        assert_eq!(repository.get_user_vote(voter_id, post).await.unwrap(), None);
    }
}

#[sqlx::test(migrator = "votes_repository::MIGRATOR")]
async fn test_racing_opposite_votes_keep_the_last_commit(pool: sqlx::PgPool) {
    let repository = Arc::new(PostgresVotesRepository::new(pool.clone()).await.unwrap());
    let ledger = Arc::new(VoteLedger::new(repository.clone()));
    let post = TargetRef::post(insert_post(&pool, 1).await);

    for voter_id in 1..=20 {
        let (up, down) = race(&ledger, voter_id, post, VoteDirection::Up, VoteDirection::Down).await;

        // Insert then flip: each call reports its own direction
        assert_eq!((up, down), (VoteState::Up, VoteState::Down), "voter {voter_id}");
        assert_eq!(ledger_rows(&pool, voter_id, post).await, 1);

        let stored = repository.get_user_vote(voter_id, post).await.unwrap().unwrap();
        assert_eq!(
            ledger.vote_state(voter_id, post).await.unwrap(),
            VoteState::from(stored.direction),
            "voter {voter_id}"
        );
    }
}

#[sqlx::test(migrator = "votes_repository::MIGRATOR")]
async fn test_gateway_votes_over_postgres(pool: sqlx::PgPool) {
    let votes = Arc::new(PostgresVotesRepository::new(pool.clone()).await.unwrap());
    let targets = Arc::new(PostgresTargetsRepository::new(pool.clone()).await.unwrap());
    let gateway = Arc::new(MutationGateway::new(
        VoteLedger::new(votes.clone()),
        ScoreAggregator::new(votes, targets.clone()),
        targets,
        None,
    ));
    let post_id = insert_post(&pool, 1).await;

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let gateway = gateway.clone();
            tokio::spawn(async move {
                gateway
                    .vote(
                        Some(9),
                        VoteRequest {
                            target_kind: "post".to_string(),
                            target_id: post_id,
                            direction: "up".to_string(),
                        },
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Three toggles in one direction leave the vote in place
    assert_eq!(ledger_rows(&pool, 9, TargetRef::post(post_id)).await, 1);
    let score = gateway.score(Some(9), "post", post_id).await.unwrap();
    assert_eq!(score.user_vote, Some(VoteState::Up));
    assert_eq!(score.score.upvotes, 1);
}
