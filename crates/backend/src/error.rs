//! API error type.
//!
//! Handlers return [`ApiResult`] and bubble failures up with `?`. Every
//! variant maps to a status code and a JSON [`ErrorResponse`] body; server
//! side failures are logged here and reach the client only as a generic
//! message.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::deadpool::PoolError;
use shared_types::ErrorResponse;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not check out a database connection")]
    Pool(#[from] PoolError),

    #[error("query failed: {0}")]
    Query(#[from] DieselError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    /// Carries the resource name, e.g. "Food record".
    #[error("{0} not found")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Query(DieselError::NotFound) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Query(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
            | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Query(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to show a client. Internal detail stays in the logs.
    fn public_body(&self) -> ErrorResponse {
        match self {
            ApiError::Pool(_) => ErrorResponse::new("Database connection unavailable"),
            ApiError::Query(DieselError::NotFound) => ErrorResponse::new("Resource not found"),
            ApiError::Query(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                ErrorResponse::new("Resource already exists")
            }
            ApiError::Query(_) => ErrorResponse::new("Database operation failed"),
            ApiError::Internal(_) => ErrorResponse::new("Internal server error"),
            ApiError::NotFound(resource) => ErrorResponse::new(format!("{} not found", resource)),
            ApiError::Validation(errors) => {
                ErrorResponse::with_details(describe_validation(errors), errors.to_string())
            }
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) | ApiError::Unauthorized(msg) => {
                ErrorResponse::new(msg.clone())
            }
        }
    }
}

/// Rule messages sorted and joined with "; ". A rule without a message is
/// reported by field name.
fn describe_validation(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

// Extractor rejections keep axum's message but use the JSON body.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self);
        } else if status == StatusCode::CONFLICT {
            tracing::warn!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status, Json(self.public_body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_of(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::not_found("Food record"), StatusCode::NOT_FOUND),
            (ApiError::bad_request("nope"), StatusCode::BAD_REQUEST),
            (ApiError::conflict("taken"), StatusCode::CONFLICT),
            (ApiError::unauthorized("who?"), StatusCode::UNAUTHORIZED),
            (ApiError::Query(DieselError::NotFound), StatusCode::NOT_FOUND),
            (ApiError::Query(DieselError::RollbackTransaction), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let (status, body) = body_of(ApiError::Internal(anyhow::anyhow!("secret stack"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.details, None);
    }

    #[tokio::test]
    async fn test_not_found_names_resource() {
        let (_, body) = body_of(ApiError::not_found("Food record")).await;
        assert_eq!(body.error, "Food record not found");
    }

    #[test]
    fn test_validation_message_uses_rule_messages() {
        let request = shared_types::RegisterRequest {
            username: "al".to_string(),
            email: "alice@example.com".to_string(),
            password: "123".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(
            describe_validation(&errors),
            "Password must be at least 6 characters; Username must be 3-50 characters"
        );
    }
}
