//! Handler wrapper generation.
//!
//! Each wrapper binds and validates a fresh request-parameter value, calls the
//! business method and turns its outcome into a JSON envelope:
//!
//! | outcome | status | envelope |
//! |---------|--------|----------|
//! | validation failed | the `ApiError` status | `{"error": msg, "response": null}` |
//! | handler returned `ApiError` | its status | `{"error": msg, "response": null}` |
//! | handler returned any other error | `500` | `{"error": err.to_string(), "response": null}` |
//! | handler succeeded | `200` | `{"error": "", "response": value}` |

use proc_macro2::TokenStream;
use quote::quote;

use super::{CodegenContext, ident, wrapper_ident};
use crate::descriptor::MethodDescriptor;

/// Generates `wrap_<method>` for one handler.
pub fn generate_wrapper(descriptor: &MethodDescriptor, ctx: &CodegenContext) -> TokenStream {
    let rt = &ctx.runtime;
    let wrapper = wrapper_ident(&descriptor.method_name);
    let method = ident(&descriptor.method_name);
    let request_type = ident(&descriptor.request_type);

    let context_arg = if descriptor.context_by_ref {
        quote!(&ctx)
    } else {
        quote!(ctx)
    };

    let call = if descriptor.is_async {
        quote!(self.#method(#context_arg, params).await)
    } else {
        quote!(self.#method(#context_arg, params))
    };

    quote! {
        async fn #wrapper(&self, req: &#rt::Request) -> #rt::Response {
            let ctx = #rt::RequestContext::from_request(req);
            let mut params = #request_type::default();
            if let Err(err) = params.validate_params(req) {
                return #rt::reply_error(err.status, err.message);
            }
            match #call {
                Ok(response) => #rt::reply_ok(&response),
                Err(err) => {
                    let err: #rt::HandlerError = err.into();
                    match err.downcast_ref::<#rt::ApiError>() {
                        Some(api_err) => #rt::reply_error(api_err.status, api_err.message.as_str()),
                        None => #rt::reply_error(#rt::http::StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
                    }
                }
            }
        }
    }
}
