//! Dispatch routine generation.
//!
//! Generates `serve_http` for a receiver type: a `match` on the request path
//! with one arm per handler, in extraction order, and a `404` fallback.
//!
//! ## Verb Resolution
//!
//! A handler whose annotation has no `method` does not go unchecked: it
//! inherits the last verb declared by a sibling handler *before it* in the
//! same receiver. Handlers before the first declared verb accept any verb.
//! [`sticky_verbs`] computes the effective verb per handler.
//!
//! ## Arm Layout
//!
//! ```ignore
//! "/user/create" => {
//!     if req.method().as_str() != "POST" {
//!         return ::apigen::reply_error(::apigen::http::StatusCode::METHOD_NOT_ALLOWED, "bad method");
//!     }
//!     if !::apigen::is_authorized(req) {
//!         return ::apigen::reply_error(::apigen::http::StatusCode::FORBIDDEN, "unauthorized");
//!     }
//!     self.wrap_create(req).await
//! }
//! ```

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use tracing::warn;

use super::{CodegenContext, wrapper_ident};
use crate::descriptor::MethodDescriptor;

/// Effective verb of each handler, threading the last declared verb forward.
///
/// ## Examples
///
/// ```
/// use apigen_gen::codegen::sticky_verbs;
/// # use apigen_gen::descriptor::MethodDescriptor;
/// # fn d(verb: Option<&str>) -> MethodDescriptor {
/// #     MethodDescriptor {
/// #         receiver_type: "Api".into(), request_type: "P".into(), method_name: "m".into(),
/// #         route: "/".into(), verb: verb.map(String::from), requires_auth: false,
/// #         is_async: false, context_by_ref: true,
/// #     }
/// # }
///
/// let handlers = [d(None), d(Some("POST")), d(None), d(Some("GET"))];
/// assert_eq!(
///     sticky_verbs(&handlers),
///     vec![None, Some("POST"), Some("POST"), Some("GET")]
/// );
/// ```
pub fn sticky_verbs(descriptors: &[MethodDescriptor]) -> Vec<Option<&str>> {
    let mut last_verb: Option<&str> = None;
    descriptors
        .iter()
        .map(|descriptor| {
            if let Some(verb) = descriptor.verb.as_deref() {
                last_verb = Some(verb);
            }
            last_verb
        })
        .collect()
}

/// Routes declared more than once, in first-seen order.
fn duplicate_routes(descriptors: &[MethodDescriptor]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for descriptor in descriptors {
        let route = descriptor.route.as_str();
        if !seen.insert(route) && !duplicates.contains(&route) {
            duplicates.push(route);
        }
    }
    duplicates
}

/// Generates the `serve_http` method for one receiver.
///
/// The first handler declared for a path wins; later duplicates are kept as
/// unreachable arms and reported with a warning.
pub fn generate_serve_http(
    receiver: &str,
    descriptors: &[MethodDescriptor],
    ctx: &CodegenContext,
) -> TokenStream {
    let rt = &ctx.runtime;

    let arms = descriptors
        .iter()
        .zip(sticky_verbs(descriptors))
        .map(|(descriptor, verb)| {
            let route = &descriptor.route;
            let wrapper = wrapper_ident(&descriptor.method_name);

            let verb_check = verb.map(|verb| {
                quote! {
                    if req.method().as_str() != #verb {
                        return #rt::reply_error(#rt::http::StatusCode::METHOD_NOT_ALLOWED, "bad method");
                    }
                }
            });

            let auth_check = descriptor.requires_auth.then(|| {
                quote! {
                    if !#rt::is_authorized(req) {
                        return #rt::reply_error(#rt::http::StatusCode::FORBIDDEN, "unauthorized");
                    }
                }
            });

            quote! {
                #route => {
                    #verb_check
                    #auth_check
                    self.#wrapper(req).await
                }
            }
        });

    let duplicates = duplicate_routes(descriptors);
    let allow_shadowed = if duplicates.is_empty() {
        None
    } else {
        warn!(
            receiver,
            routes = ?duplicates,
            "duplicate routes, the first declared handler wins"
        );
        Some(quote!(#[allow(unreachable_patterns)]))
    };

    let doc = format!("Routes a request to the matching `{}` handler.", receiver);

    quote! {
        #[doc = #doc]
        #allow_shadowed
        pub async fn serve_http(&self, req: &#rt::Request) -> #rt::Response {
            match req.uri().path() {
                #(#arms)*
                _ => #rt::reply_error(#rt::http::StatusCode::NOT_FOUND, "unknown method"),
            }
        }
    }
}
