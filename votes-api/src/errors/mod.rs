//! Error types for the votes API.
//! `AppError` covers startup and serving failures of the binary; `ApiError`
//! is what a request handler returns and knows how to render itself as a
//! JSON error response.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use votes_service::{ErrorKind, VoteError};

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Repository error: {0}")]
    Repository(#[from] votes_repository::VotesRepositoryError),
    #[error("Authentication setup error: {0}")]
    Auth(#[from] AuthError),
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }
}

/// Failure of a single API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Vote(#[from] VoteError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Auth(_) => ErrorKind::Auth,
            ApiError::Vote(e) => e.kind(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Auth => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Malformed bodies, paths and query strings are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Vote(VoteError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Vote(VoteError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Vote(VoteError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        // Storage details stay in the logs.
        let message = if kind == ErrorKind::Internal {
            error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            self.status_code(),
            Json(serde_json::json!({
                "status": "error",
                "kind": kind.as_str(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votes_repository::{TargetsRepositoryError, VotesRepositoryError};

    #[test]
    fn test_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (AuthError::Expired.into(), StatusCode::UNAUTHORIZED),
            (VoteError::Auth("anonymous".into()).into(), StatusCode::UNAUTHORIZED),
            (VoteError::NotFound("post:1 not found".into()).into(), StatusCode::NOT_FOUND),
            (VoteError::Validation("bad".into()).into(), StatusCode::BAD_REQUEST),
            (
                VoteError::from(VotesRepositoryError::Conflict("voter 1".into())).into(),
                StatusCode::CONFLICT,
            ),
            (
                VoteError::from(TargetsRepositoryError::DatabaseError(sqlx::Error::PoolClosed)).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        use http_body_util::BodyExt;

        let response = ApiError::from(VoteError::NotFound("post:7 not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["message"], "Not found: post:7 not found");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        use http_body_util::BodyExt;

        let error: ApiError =
            VoteError::from(TargetsRepositoryError::DatabaseError(sqlx::Error::PoolClosed)).into();
        let response = error.into_response();

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "internal");
        assert_eq!(body["message"], "internal server error");
    }
}
