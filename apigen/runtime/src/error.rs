use http::StatusCode;
use thiserror::Error;

/// Error type returned by business methods of generated handlers.
///
/// Any error convertible into [`HandlerError`] is accepted; the wrapper replies
/// with the status and message of an `ApiError` and with `500` for anything else.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// An error with an explicit HTTP status, surfaced to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({status})")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A `400 Bad Request` error, as produced by failed validation.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}
