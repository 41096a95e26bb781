// App state for the Axum server
use std::sync::Arc;
use votes_service::MutationGateway;

use crate::auth::JwtValidator;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<MutationGateway>,
    pub jwt_validator: Arc<JwtValidator>,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
    use chrono::{Duration, Utc};
    use votes_repository::{InMemoryTargetsRepository, InMemoryVotesRepository};
    use votes_service::{ScoreAggregator, VoteLedger};
    use votes_shared::types::{Target, TargetRef};

    pub const SECRET: &str = "a-test-secret-that-is-long-enough-1234";

    /// In-memory state holding post 1 (three hours old) and post 2 (one hour old).
    pub async fn seeded_state() -> AppState {
        let votes = Arc::new(InMemoryVotesRepository::new());
        let targets = Arc::new(InMemoryTargetsRepository::new());
        for (id, age) in [(1, 3), (2, 1)] {
            targets
                .insert(Target {
                    target: TargetRef::post(id),
                    author_id: 100,
                    created_at: Utc::now() - Duration::hours(age),
                })
                .await;
        }

        let gateway = MutationGateway::new(
            VoteLedger::new(votes.clone()),
            ScoreAggregator::new(votes, targets.clone()),
            targets,
            None,
        );
        AppState {
            gateway: Arc::new(gateway),
            jwt_validator: Arc::new(JwtValidator::new(SECRET).unwrap()),
        }
    }

    pub fn bearer(state: &AppState, voter_id: i64) -> HeaderValue {
        let token = state.jwt_validator.generate_token(voter_id, "tester");
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    pub fn auth_headers(state: &AppState, voter_id: i64) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer(state, voter_id));
        headers
    }
}
