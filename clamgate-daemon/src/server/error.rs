//! Mapping of request failures to HTTP responses.
//!
//! Two tiers: malformed client input becomes a 4xx with a short description,
//! anything that went wrong talking to the daemon becomes a 500 carrying the
//! underlying message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(&'static str),

    /// Daemon unreachable, timed out, or answered with something unusable
    #[error("{action}: {reason}")]
    Backend { action: &'static str, reason: String },
}

impl ApiError {
    pub fn backend(action: &'static str, reason: impl ToString) -> Self {
        ApiError::Backend {
            action,
            reason: reason.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Backend { .. } = &self {
            warn!("{}", self);
        }
        (self.status(), self.to_string()).into_response()
    }
}
