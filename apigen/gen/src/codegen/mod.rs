//! Code generation for handler dispatch and request validation.
//!
//! ## Submodules
//!
//! - [`dispatch`] - Generates `serve_http`, routing a request to a handler wrapper
//! - [`wrapper`] - Generates one `wrap_<method>` per handler
//! - [`validator`] - Generates `validate_params` for each request struct
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`. Generated code refers to
//! runtime items through the absolute path held by [`CodegenContext`], so the
//! output can be `include!`d into any module without adding `use` items.
//! See [`crate::output`] for assembly, validation and formatting.

pub mod dispatch;
pub mod validator;
pub mod wrapper;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::config::{BindingMode, GeneratorConfig};
use crate::descriptor::MethodDescriptor;
use crate::errors::GeneratorError;

pub use dispatch::{generate_serve_http, sticky_verbs};
pub use validator::generate_validator;
pub use wrapper::generate_wrapper;

/// Settings shared by every generator within one run.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    /// Absolute path of the runtime crate.
    pub runtime: syn::Path,
    pub binding: BindingMode,
}

impl CodegenContext {
    /// Builds the context from a generator configuration.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` if the runtime path does not parse.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            runtime: config.runtime_path()?,
            binding: config.binding,
        })
    }
}

impl Default for CodegenContext {
    fn default() -> Self {
        Self {
            runtime: syn::parse_quote!(::apigen),
            binding: BindingMode::default(),
        }
    }
}

/// Turns a stored identifier (possibly `r#`-prefixed) back into an [`Ident`].
pub(crate) fn ident(name: &str) -> Ident {
    format_ident!("{}", name)
}

/// Name of the generated wrapper for a business method.
pub fn wrapper_ident(method_name: &str) -> Ident {
    format_ident!("wrap_{}", method_name.trim_start_matches("r#"))
}

/// Generates the `impl` block holding a receiver's dispatch routine and wrappers.
///
/// ## Examples
///
/// For a receiver `MyApi` with handlers `profile` and `create`:
///
/// ```ignore
/// impl MyApi {
///     pub async fn serve_http(&self, req: &::apigen::Request) -> ::apigen::Response { ... }
///     async fn wrap_profile(&self, req: &::apigen::Request) -> ::apigen::Response { ... }
///     async fn wrap_create(&self, req: &::apigen::Request) -> ::apigen::Response { ... }
/// }
/// ```
pub fn generate_receiver_impl(
    receiver: &str,
    descriptors: &[MethodDescriptor],
    ctx: &CodegenContext,
) -> TokenStream {
    let receiver_ident = ident(receiver);
    let serve_http = generate_serve_http(receiver, descriptors, ctx);
    let wrappers = descriptors.iter().map(|d| generate_wrapper(d, ctx));

    quote! {
        impl #receiver_ident {
            #serve_http

            #(#wrappers)*
        }
    }
}

#[cfg(test)]
pub(crate) fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}
