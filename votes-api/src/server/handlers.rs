// HTTP request handlers
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use votes_service::gateway::{ScoreView, VoteOutcome, VoteRequest};
use votes_shared::types::TargetId;

use crate::auth::voter_from_headers;
use crate::errors::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RankingResponse {
    pub target_ids: Vec<TargetId>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Votes API is running")
}

/// Vote endpoint - casts, flips or withdraws the caller's vote
pub async fn cast_vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteOutcome>, ApiError> {
    let Json(payload) = payload?;
    let voter = voter_from_headers(&headers, &state.jwt_validator)?;
    let outcome = state.gateway.vote(voter, payload).await?;
    Ok(Json(outcome))
}

/// Score endpoint - includes `user_vote` when the caller sent a valid token
pub async fn get_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<(String, TargetId)>, PathRejection>,
) -> Result<Json<ScoreView>, ApiError> {
    let Path((kind, id)) = path?;
    let viewer = voter_from_headers(&headers, &state.jwt_validator)?;
    let score = state.gateway.score(viewer, &kind, id).await?;
    Ok(Json(score))
}

/// Ranking endpoint - pages target ids of one kind by `new`, `top` or `hot`
pub async fn get_rankings(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<RankingParams>, QueryRejection>,
) -> Result<Json<RankingResponse>, ApiError> {
    let Path(kind) = path?;
    let Query(params) = query?;
    let target_ids = state
        .gateway
        .rank(&kind, params.sort_by.as_deref(), params.limit, params.offset)
        .await?;
    info!(kind = %kind, sort_by = ?params.sort_by, count = target_ids.len(), "Ranking served");
    Ok(Json(RankingResponse { target_ids }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::AUTHORIZATION};
    use votes_service::ErrorKind;
    use votes_shared::types::VoteState;

    use crate::server::state::testing::{auth_headers, seeded_state as state};

    fn vote_request(id: i64, direction: &str) -> Result<Json<VoteRequest>, JsonRejection> {
        Ok(Json(VoteRequest {
            target_kind: "post".to_string(),
            target_id: id,
            direction: direction.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_cast_vote_with_token() {
        let state = state().await;
        let headers = auth_headers(&state, 7);

        let Json(outcome) = cast_vote(State(state), headers, vote_request(1, "up")).await.unwrap();

        assert_eq!(outcome.vote_state, VoteState::Up);
        assert_eq!(outcome.score.upvotes, 1);
        let body = serde_json::to_value(outcome).unwrap();
        assert_eq!(body["vote_state"], "up");
        assert_eq!(body["net"], 1);
    }

    #[tokio::test]
    async fn test_cast_vote_without_token_is_unauthorized() {
        let state = state().await;

        let error = cast_vote(State(state), HeaderMap::new(), vote_request(1, "up"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Auth);
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cast_vote_with_bad_token_is_unauthorized() {
        let state = state().await;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer not.a.jwt"));

        let error = cast_vote(State(state), headers, vote_request(1, "up")).await.unwrap_err();

        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cast_vote_on_missing_post_is_not_found() {
        let state = state().await;
        let headers = auth_headers(&state, 7);

        let error = cast_vote(State(state), headers, vote_request(99, "down")).await.unwrap_err();

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_score_reports_viewer_vote() {
        let state = state().await;
        let headers = auth_headers(&state, 7);
        cast_vote(State(state.clone()), headers.clone(), vote_request(1, "down"))
            .await
            .unwrap();

        let Json(anonymous) = get_score(State(state.clone()), HeaderMap::new(), Ok(Path(("post".to_string(), 1))))
            .await
            .unwrap();
        assert_eq!(anonymous.score.net, -1);
        assert_eq!(anonymous.user_vote, None);
        assert!(serde_json::to_value(anonymous).unwrap().get("user_vote").is_none());

        let Json(viewer) = get_score(State(state), headers, Ok(Path(("post".to_string(), 1))))
            .await
            .unwrap();
        assert_eq!(viewer.user_vote, Some(VoteState::Down));
    }

    #[tokio::test]
    async fn test_rankings() {
        let state = state().await;
        let headers = auth_headers(&state, 7);
        cast_vote(State(state.clone()), headers, vote_request(1, "up")).await.unwrap();

        let params = RankingParams {
            sort_by: Some("top".to_string()),
            ..Default::default()
        };
        let Json(top) = get_rankings(State(state.clone()), Ok(Path("post".to_string())), Ok(Query(params)))
            .await
            .unwrap();
        assert_eq!(top.target_ids, vec![1, 2]);

        let params = RankingParams {
            sort_by: Some("new".to_string()),
            ..Default::default()
        };
        let Json(new) = get_rankings(State(state), Ok(Path("post".to_string())), Ok(Query(params)))
            .await
            .unwrap();
        assert_eq!(new.target_ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_rankings_reject_unknown_sort() {
        let state = state().await;
        let params = RankingParams {
            sort_by: Some("controversial".to_string()),
            ..Default::default()
        };

        let error = get_rankings(State(state), Ok(Path("post".to_string())), Ok(Query(params)))
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
