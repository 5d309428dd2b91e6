//! Parameter lookup and authorization for incoming requests.

use std::borrow::Cow;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method};
use tracing::debug;

use crate::Request;

/// Header carrying the shared secret for handlers marked `"auth": true`.
pub const AUTH_HEADER: &str = "X-Auth";

/// Value [`AUTH_HEADER`] must carry.
pub const AUTH_TOKEN: &str = "100500";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Whether the request carries the expected shared secret.
pub fn is_authorized(req: &Request) -> bool {
    let authorized = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some(AUTH_TOKEN);

    if !authorized {
        debug!(path = %req.uri().path(), "missing or invalid {} header", AUTH_HEADER);
    }
    authorized
}

fn lookup(encoded: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(encoded.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| Cow::into_owned(value))
}

/// First value of `name` in the query string, empty when absent.
pub fn query_value(req: &Request, name: &str) -> String {
    req.uri()
        .query()
        .and_then(|query| lookup(query, name))
        .unwrap_or_default()
}

/// First value of `name` in an urlencoded body, falling back to the query string.
///
/// The body is only consulted when the request declares
/// `Content-Type: application/x-www-form-urlencoded`.
pub fn form_value(req: &Request, name: &str) -> String {
    let is_form = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

    if is_form && let Some(value) = lookup(req.body(), name) {
        return value;
    }
    query_value(req, name)
}

/// Request metadata handed to business methods.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            headers: req.headers().clone(),
        }
    }

    /// Value of header `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
