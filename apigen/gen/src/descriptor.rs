//! Method descriptor extraction.
//!
//! Turns each [`AnnotatedMethod`] into a [`MethodDescriptor`] and groups the
//! descriptors by receiver type in a [`RouteTable`].
//!
//! ## Annotation Format
//!
//! ```text
//! /// apigen:api {"url": "/user/profile", "auth": true, "method": "GET"}
//! pub async fn profile(&self, ctx: &RequestContext, params: ProfileParams) -> Result<User, ApiError>
//! ```
//!
//! Only `url` is required. `auth` defaults to `false` and an empty or absent
//! `method` leaves the verb unset (see [`crate::codegen::dispatch`] for how
//! unset verbs are resolved).

use indexmap::IndexMap;
use quote::ToTokens;
use serde::Deserialize;
use syn::{FnArg, PatType, Type};
use tracing::debug;

use crate::errors::GeneratorError;
use crate::scanner::{AnnotatedMethod, annotated_methods};

/// The JSON payload carried by the marker annotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteAnnotation {
    pub url: String,
    #[serde(default)]
    pub auth: bool,
    #[serde(default)]
    pub method: String,
}

/// Routing metadata for one annotated handler method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Name of the type owning the handler.
    pub receiver_type: String,
    /// Name of the handler's request-parameter type.
    pub request_type: String,
    /// Business method identifier.
    pub method_name: String,
    /// URL path matched exactly against the request path.
    pub route: String,
    /// Declared HTTP verb, `None` when the annotation leaves it empty.
    pub verb: Option<String>,
    pub requires_auth: bool,
    /// Whether the business method must be awaited.
    pub is_async: bool,
    /// Whether the context parameter is taken by reference.
    pub context_by_ref: bool,
}

/// Descriptors grouped by receiver type, both in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    receivers: IndexMap<String, Vec<MethodDescriptor>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor to its receiver's list.
    pub fn insert(&mut self, descriptor: MethodDescriptor) {
        self.receivers
            .entry(descriptor.receiver_type.clone())
            .or_default()
            .push(descriptor);
    }

    /// Iterates receivers with their descriptors.
    pub fn receivers(&self) -> impl Iterator<Item = (&str, &[MethodDescriptor])> {
        self.receivers
            .iter()
            .map(|(name, descriptors)| (name.as_str(), descriptors.as_slice()))
    }

    /// Iterates every descriptor, receiver by receiver.
    pub fn descriptors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.receivers.values().flatten()
    }

    /// Returns `true` if some handler takes `type_name` as its request parameter.
    pub fn references(&self, type_name: &str) -> bool {
        self.descriptors().any(|d| d.request_type == type_name)
    }

    /// Number of descriptors across all receivers.
    pub fn len(&self) -> usize {
        self.receivers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }
}

/// Extracts the descriptor for one annotated method.
///
/// ## Errors
///
/// - `GeneratorError::AnnotationError` if the payload is not a valid annotation
/// - `GeneratorError::UnsupportedReceiver` if the `impl` self type is not a plain name
/// - `GeneratorError::UnexpectedParamCount` unless exactly two parameters follow `self`
/// - `GeneratorError::UnsupportedParamType` if the request parameter is not a plain name
pub fn extract_descriptor(method: &AnnotatedMethod<'_>) -> Result<MethodDescriptor, GeneratorError> {
    let method_name = method.name();

    let annotation: RouteAnnotation =
        serde_json::from_str(&method.payload).map_err(|source| GeneratorError::AnnotationError {
            method: method_name.clone(),
            source,
        })?;

    let receiver_type = receiver_name(method.self_ty).ok_or_else(|| {
        GeneratorError::UnsupportedReceiver {
            method: method_name.clone(),
            found: render(method.self_ty),
        }
    })?;

    let params: Vec<&PatType> = method
        .method
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let [context, request] = params.as_slice() else {
        return Err(GeneratorError::UnexpectedParamCount {
            method: method_name,
            found: params.len(),
        });
    };

    let request_type =
        plain_type_name(&request.ty).ok_or_else(|| GeneratorError::UnsupportedParamType {
            method: method_name.clone(),
            found: render(&request.ty),
        })?;

    let descriptor = MethodDescriptor {
        receiver_type,
        request_type,
        method_name,
        route: annotation.url,
        verb: Some(annotation.method).filter(|verb| !verb.is_empty()),
        requires_auth: annotation.auth,
        is_async: method.method.sig.asyncness.is_some(),
        context_by_ref: matches!(&*context.ty, Type::Reference(_)),
    };

    debug!(
        receiver = %descriptor.receiver_type,
        method = %descriptor.method_name,
        route = %descriptor.route,
        verb = ?descriptor.verb,
        auth = descriptor.requires_auth,
        "extracted handler descriptor"
    );

    Ok(descriptor)
}

/// Scans `file` and extracts every annotated handler into a [`RouteTable`].
///
/// ## Errors
///
/// Fails on the first handler that [`extract_descriptor`] rejects.
pub fn extract_route_table(file: &syn::File) -> Result<RouteTable, GeneratorError> {
    let mut table = RouteTable::new();
    for method in annotated_methods(file) {
        table.insert(extract_descriptor(&method)?);
    }
    Ok(table)
}

/// Resolves the receiver name, unwrapping one reference (`impl &Api`).
fn receiver_name(self_ty: &Type) -> Option<String> {
    match self_ty {
        Type::Reference(reference) => plain_type_name(&reference.elem),
        other => plain_type_name(other),
    }
}

/// Returns the identifier of a single-segment, non-generic type path.
pub(crate) fn plain_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            type_path.path.get_ident().map(|ident| ident.to_string())
        }
        Type::Group(group) => plain_type_name(&group.elem),
        _ => None,
    }
}

pub(crate) fn render(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}
