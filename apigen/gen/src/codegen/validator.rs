//! Request validation generation.
//!
//! Generates `validate_params` for a request struct. Every field gets its own
//! block that reads the external value, applies the default and then runs the
//! enum, length and range checks before assigning into the field. Because the
//! default is applied first, a default value is validated like any other.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use super::{CodegenContext, ident};
use crate::config::BindingMode;
use crate::rules::{FieldKind, FieldRule};

/// Generates the `impl` block holding `validate_params` for `type_name`.
pub fn generate_validator(type_name: &str, rules: &[FieldRule], ctx: &CodegenContext) -> TokenStream {
    let rt = &ctx.runtime;
    let type_ident = ident(type_name);
    let source = match ctx.binding {
        BindingMode::Query => "query",
        BindingMode::Form => "form",
    };
    let doc = format!(
        "Binds and validates `{}` from the request's {} parameters.",
        type_name, source
    );

    let body = if rules.is_empty() {
        quote!(let _ = req;)
    } else {
        let blocks = rules.iter().map(|rule| generate_field_block(rule, ctx));
        quote!(#(#blocks)*)
    };

    quote! {
        impl #type_ident {
            #[doc = #doc]
            pub fn validate_params(&mut self, req: &#rt::Request) -> Result<(), #rt::ApiError> {
                #body
                Ok(())
            }
        }
    }
}

fn generate_field_block(rule: &FieldRule, ctx: &CodegenContext) -> TokenStream {
    let rt = &ctx.runtime;
    let lookup = format_ident!("{}", ctx.binding.lookup_fn());
    let name = rule.external_name.as_str();

    let required_check = rule.required.then(|| {
        let message = format!("{} must not be empty", name);
        quote! {
            if value.is_empty() {
                return Err(#rt::ApiError::bad_request(#message));
            }
        }
    });

    let apply_default = rule.default_value.as_deref().map(|default| {
        quote! {
            let value = if value.is_empty() { String::from(#default) } else { value };
        }
    });

    let checks = generate_checks(rule, ctx);

    quote! {
        {
            let value = #rt::#lookup(req, #name);
            #required_check
            #apply_default
            #checks
        }
    }
}

/// Enum, length and range checks followed by the assignment.
fn generate_checks(rule: &FieldRule, ctx: &CodegenContext) -> TokenStream {
    let rt = &ctx.runtime;
    let name = rule.external_name.as_str();
    let field = ident(&rule.source_field);

    let enum_check = (!rule.enum_values.is_empty()).then(|| {
        let allowed = &rule.enum_values;
        let message = format!("{} must be one of [{}]", name, allowed.join(", "));
        quote! {
            if ![#(#allowed),*].contains(&value.as_str()) {
                return Err(#rt::ApiError::bad_request(#message));
            }
        }
    });

    match &rule.kind {
        FieldKind::Text => {
            let length_check = (rule.min > 0).then(|| {
                let min = Literal::u64_unsuffixed(rule.min.unsigned_abs());
                let message = format!("{} len must be >= {}", name, rule.min);
                quote! {
                    if value.chars().count() < #min {
                        return Err(#rt::ApiError::bad_request(#message));
                    }
                }
            });

            quote! {
                #enum_check
                #length_check
                self.#field = value;
            }
        }
        FieldKind::Integer { ty, signed } => {
            let ty = ident(ty);
            let parse_message = format!("{} must be int", name);

            let min_check = (*signed || rule.min > 0).then(|| {
                let min = bound_literal(rule.min);
                let message = format!("{} must be >= {}", name, rule.min);
                quote! {
                    if parsed < #min {
                        return Err(#rt::ApiError::bad_request(#message));
                    }
                }
            });

            let max_check = (rule.max != 0).then(|| {
                let max = bound_literal(rule.max);
                let message = format!("{} must be <= {}", name, rule.max);
                quote! {
                    if parsed > #max {
                        return Err(#rt::ApiError::bad_request(#message));
                    }
                }
            });

            quote! {
                #enum_check
                let parsed: #ty = value
                    .parse()
                    .map_err(|_| #rt::ApiError::bad_request(#parse_message))?;
                #min_check
                #max_check
                self.#field = parsed;
            }
        }
    }
}

/// Unsuffixed integer literal, so it adopts the compared field's type.
fn bound_literal(value: i64) -> TokenStream {
    let magnitude = Literal::u64_unsuffixed(value.unsigned_abs());
    if value < 0 {
        quote!(-#magnitude)
    } else {
        quote!(#magnitude)
    }
}
