//! HTTP error responses.
//!
//! Every failure leaves the service as `{"status": "error", "message": ...}` with
//! the matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

pub use docgate_core::error::{DocumentStoreError, DocumentStoreResult, QueryError, QueryResult};
use docgate_core::response::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid or missing API key")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

/// A specialized `Result` type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Query(err) => err.status_code(),
            ApiError::Store(err) => match err {
                DocumentStoreError::DocumentAlreadyExists(..) => StatusCode::CONFLICT,
                DocumentStoreError::DocumentNotFound(..) => StatusCode::NOT_FOUND,
                DocumentStoreError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
                DocumentStoreError::Initialization(_) | DocumentStoreError::Backend(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (DocumentStoreError::DocumentAlreadyExists("a".into(), "c".into()), StatusCode::CONFLICT),
            (DocumentStoreError::DocumentNotFound("a".into(), "c".into()), StatusCode::NOT_FOUND),
            (DocumentStoreError::Backend("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn query_errors_keep_their_status() {
        let err = ApiError::from(QueryError::InvalidOffset("must be >= 0"));

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Offset must be >= 0");
    }
}
