use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::Error;

/// Client-facing detail for store failures; the driver error is only logged.
const DATABASE_FAILURE_MESSAGE: &str = "query failed";

/// API error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Month path segment not recognized for this endpoint
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// `page` is not a positive integer
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// The store failed
    #[error("Database error: {0}")]
    Database(String),

    /// The remote dataset could not be fetched
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

impl ApiError {
    /// Status code and machine-readable kind for this error.
    #[must_use]
    pub const fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidMonth(_) => (StatusCode::BAD_REQUEST, "invalid_month"),
            Self::InvalidPage(_) => (StatusCode::BAD_REQUEST, "invalid_page"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();

        if status.is_server_error() {
            tracing::error!(kind = error_type, "Request failed: {self}");
        } else {
            tracing::warn!(kind = error_type, "Request rejected: {self}");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::UnknownMonth { name } => Self::InvalidMonth(name),
            Error::InvalidPage { raw } => Self::InvalidPage(raw),
            Error::Database(e) => {
                tracing::error!(error = %e, "Store query failed");
                Self::Database(DATABASE_FAILURE_MESSAGE.to_string())
            }
            Error::Upstream(e) => Self::Upstream(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_error_mapping() {
        let cases = [
            (
                ApiError::from(Error::UnknownMonth {
                    name: "smarch".to_string(),
                }),
                StatusCode::BAD_REQUEST,
                "invalid_month",
            ),
            (
                ApiError::from(Error::InvalidPage {
                    raw: "x".to_string(),
                }),
                StatusCode::BAD_REQUEST,
                "invalid_page",
            ),
            (
                ApiError::from(Error::Database(DbErr::Custom("boom".to_string()))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
            ),
            (
                ApiError::from(Error::Config {
                    message: "bad".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (error, status, kind) in cases {
            assert_eq!(error.status_and_kind(), (status, kind));
        }
    }

    #[test]
    fn test_database_detail_stays_server_side() {
        let error = ApiError::from(Error::Database(DbErr::Custom(
            "SELECT * FROM products: disk I/O error".to_string(),
        )));
        let message = error.to_string();
        assert_eq!(message, "Database error: query failed");
        assert!(!message.contains("SELECT"));
        assert!(!message.contains("disk I/O"));
    }
}
