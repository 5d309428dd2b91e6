//! JSON envelope responses.

use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Response;

/// Body of every generated response.
///
/// `error` is empty on success; `response` is `null` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub error: String,
    pub response: Option<T>,
}

fn json_response(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Replies `status` with `{"error": message, "response": null}`.
pub fn reply_error(status: StatusCode, message: impl Into<String>) -> Response {
    let envelope: ResponseEnvelope<()> = ResponseEnvelope {
        error: message.into(),
        response: None,
    };
    debug!(status = %status, error = %envelope.error, "rejecting request");

    // A string and a null always serialize.
    let body = serde_json::to_string(&envelope)
        .unwrap_or_else(|_| r#"{"error":"internal error","response":null}"#.to_string());
    json_response(status, body)
}

/// Replies `200` with `{"error": "", "response": value}`.
///
/// Falls back to a `500` envelope when `value` cannot be serialized.
pub fn reply_ok<T: Serialize + ?Sized>(value: &T) -> Response {
    let envelope = ResponseEnvelope {
        error: String::new(),
        response: Some(value),
    };
    match serde_json::to_string(&envelope) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => reply_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
