//! Declaration scanning for a parsed compilation unit.
//!
//! Classifies the top-level items of a [`syn::File`] into annotated handler
//! methods and record types. Everything else is dropped without diagnostics.

use syn::{Attribute, Expr, ExprLit, Fields, ImplItem, ImplItemFn, Item, ItemStruct, Lit, Meta, Type};

/// Marker that must open a handler method's doc text.
pub const MARKER: &str = "apigen:api";

/// A method that carries the marker annotation.
#[derive(Debug, Clone)]
pub struct AnnotatedMethod<'a> {
    /// Self type of the enclosing `impl` block.
    pub self_ty: &'a Type,
    /// The method itself.
    pub method: &'a ImplItemFn,
    /// Doc text following the marker, trimmed.
    pub payload: String,
}

impl AnnotatedMethod<'_> {
    pub fn name(&self) -> String {
        self.method.sig.ident.to_string()
    }
}

/// Reconstructs the doc comment text from `#[doc = "..."]` attributes.
///
/// Each line loses one leading space (the rustdoc convention for `/// text`)
/// and lines are joined with `\n`. Returns `None` when there are no doc
/// attributes at all.
pub fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => {
                    let line = s.value();
                    Some(line.strip_prefix(' ').unwrap_or(&line).to_string())
                }
                _ => None,
            },
            _ => None,
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Returns the marker payload if `doc` opens with the marker token.
///
/// The marker must be followed by whitespace or end the text, so
/// `apigen:apis` is not a marker.
pub fn marker_payload(doc: &str) -> Option<&str> {
    let rest = doc.trim_start().strip_prefix(MARKER)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        Some(_) => None,
    }
}

/// Iterates methods that take `self` and whose doc text opens with [`MARKER`].
///
/// Methods of both inherent and trait `impl` blocks are considered, in
/// declaration order.
pub fn annotated_methods(file: &syn::File) -> impl Iterator<Item = AnnotatedMethod<'_>> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Impl(item_impl) => Some(item_impl),
            _ => None,
        })
        .flat_map(|item_impl| {
            item_impl.items.iter().filter_map(move |impl_item| match impl_item {
                ImplItem::Fn(method) => Some((item_impl.self_ty.as_ref(), method)),
                _ => None,
            })
        })
        .filter_map(|(self_ty, method)| {
            method.sig.receiver()?;
            let doc = doc_text(&method.attrs)?;
            let payload = marker_payload(&doc)?.to_string();
            Some(AnnotatedMethod {
                self_ty,
                method,
                payload,
            })
        })
}

/// Iterates structs with named fields, in declaration order.
pub fn record_types(file: &syn::File) -> impl Iterator<Item = &ItemStruct> {
    file.items.iter().filter_map(|item| match item {
        Item::Struct(item_struct) if matches!(item_struct.fields, Fields::Named(_)) => {
            Some(item_struct)
        }
        _ => None,
    })
}
