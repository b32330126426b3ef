//! API error types and response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::history::StoreError;
use crate::picker::PickError;
use crate::source::{FetchError, InvalidSortOrder, SortOrder};

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The subreddit does not exist.
    #[error("no such subreddit: {0}")]
    NotFound(String),

    /// The subreddit is private.
    #[error("this subreddit is private: {0}")]
    Forbidden(String),

    /// Upstream is down or unreachable.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered in a way we cannot use.
    #[error("upstream error: {0}")]
    UpstreamError(String),

    /// The listing was fetched but held no picture posts.
    #[error("no picture posts found in {subreddit}/{listing}")]
    NoPicturesFound { subreddit: String, listing: SortOrder },

    /// The picker ran on an empty set; the handler should have prevented it.
    #[error("internal error: {0}")]
    EmptyCandidateSet(#[from] PickError),

    /// The history store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// A query parameter failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(source) => Self::NotFound(source),
            FetchError::Forbidden(source) => Self::Forbidden(source),
            err @ (FetchError::UpstreamUnavailable(_) | FetchError::Transport(_)) => {
                Self::UpstreamUnavailable(err.to_string())
            }
            err @ (FetchError::UpstreamStatus(_)
            | FetchError::Malformed(_)
            | FetchError::InvalidBaseUrl(_)) => {
                Self::UpstreamError(err.to_string())
            }
        }
    }
}

impl From<InvalidSortOrder> for ApiError {
    fn from(err: InvalidSortOrder) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ApiError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::NoPicturesFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UpstreamUnavailable(_) | Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::EmptyCandidateSet(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UpstreamError(_) => "upstream_error",
            Self::NoPicturesFound { .. } => "no_pictures_found",
            Self::EmptyCandidateSet(_) => "internal_error",
            Self::Storage(_) => "storage_error",
            Self::Validation(_) => "validation_error",
        }
    }
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::EmptyCandidateSet(err) => {
                tracing::error!(error = %err, "picker invoked without candidates");
                "An internal error occurred".to_string()
            }
            Self::Storage(err) => {
                tracing::error!(error = %err, "history store error");
                "The history store is temporarily unavailable".to_string()
            }
            Self::UpstreamUnavailable(_) | Self::UpstreamError(_) => {
                tracing::warn!(error = %self, "upstream failure");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: self.code(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}
