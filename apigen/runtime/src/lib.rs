//! Runtime support for handlers generated by `apigen-gen`.
//!
//! Generated code refers to everything here through an absolute path
//! (`::apigen::...` by default), so the generated unit can be `include!`d
//! without adding `use` items.
//!
//! ## Wire Contract
//!
//! Every response body is a JSON [`ResponseEnvelope`]:
//!
//! ```text
//! {"error": "", "response": {...}}        // success, 200
//! {"error": "login must not be empty", "response": null}
//! ```
//!
//! Handlers marked `"auth": true` require the [`AUTH_HEADER`] header to carry
//! [`AUTH_TOKEN`].

mod error;
mod reply;
mod request;

pub use error::{ApiError, HandlerError};
pub use reply::{ResponseEnvelope, reply_error, reply_ok};
pub use request::{AUTH_HEADER, AUTH_TOKEN, RequestContext, form_value, is_authorized, query_value};

pub use apigen_macros::ApiParams;
pub use http;

/// Request type served by generated dispatch routines.
pub type Request = http::Request<String>;

/// Response type produced by generated dispatch routines.
pub type Response = http::Response<String>;
