//! apigen code generator library.
//!
//! This crate scans a Rust source unit for handler methods annotated with
//! `apigen:api` and generates, as a separate unit meant to be `include!`d next
//! to the handlers:
//!
//! - A `serve_http` dispatch method per receiver type, routing by URL path
//!   with verb and shared-secret auth checks
//! - A `wrap_<method>` per handler that binds, validates, calls and replies
//! - A `validate_params` method per request-parameter struct, driven by the
//!   `#[apivalidator("...")]` tags on its fields
//!
//! ## Modules
//!
//! - [`scanner`] - Finds annotated methods and record types in a parsed unit
//! - [`descriptor`] - Extracts routing metadata into a [`descriptor::RouteTable`]
//! - [`rules`] - Extracts per-field validation rules
//! - [`codegen`] - Token generation for dispatch, wrappers and validators
//! - [`output`] - Final assembly, validation and file writing
//! - [`config`] - Per-run configuration
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```
//! use apigen_gen::config::GeneratorConfig;
//! use apigen_gen::output::generate_source;
//!
//! let source = r#"
//!     pub struct Api;
//!     pub struct PingParams {
//!         #[apivalidator("required")]
//!         pub name: String,
//!     }
//!     impl Api {
//!         /// apigen:api {"url": "/ping", "method": "GET"}
//!         pub async fn ping(&self, ctx: &RequestContext, params: PingParams) -> Result<String, ApiError> {
//!             Ok(params.name)
//!         }
//!     }
//! "#;
//!
//! let code = generate_source(source, &GeneratorConfig::default()).unwrap();
//! assert!(code.contains("pub async fn serve_http"));
//! assert!(code.contains("impl PingParams"));
//! ```
//!
//! From a build script, use [`output::generate_file`] and `include!` the
//! result from `OUT_DIR`.

pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod output;
pub mod rules;
pub mod scanner;

#[cfg(test)]
pub(crate) mod test_utils;
