//! Failure responses
//!
//! Every handler failure becomes an [`ApiError`]; its `IntoResponse`
//! impl is the one place where [`classify`] runs.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use phonebook_core::{Error, classify};

use crate::protocol::ErrorBody;

/// Reason given for bodies that are not a JSON object of the right shape
pub const MALFORMED_BODY: &str = "Malformed request body";

/// Handler failure
#[derive(Debug)]
pub enum ApiError {
    /// A directory operation failed
    Directory(Error),
    /// The request body could not be decoded
    MalformedBody(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Directory(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Directory(err) => {
                let outcome = classify(&err);
                let status = StatusCode::from_u16(outcome.kind.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                tracing::debug!("Request failed: {} ({})", outcome.reason, status);
                error_response(status, outcome.reason)
            }
            ApiError::MalformedBody(detail) => {
                tracing::debug!("Malformed request body: {}", detail);
                error_response(StatusCode::BAD_REQUEST, MALFORMED_BODY)
            }
        }
    }
}

/// `{ "error": reason }` with the given status
pub fn error_response(status: StatusCode, reason: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: reason.into(),
        }),
    )
        .into_response()
}
