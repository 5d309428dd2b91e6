use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive `ApiParams` for request-parameter structs.
///
/// Registers the `#[apivalidator("...")]` field attribute so annotated
/// structs compile, and checks each tag early:
/// - the argument must be a single string literal
/// - `min=` and `max=` must be decimal integers
///
/// Binding and validation code itself is produced by `apigen-gen`; this
/// derive expands to nothing.
#[proc_macro_derive(ApiParams, attributes(apivalidator))]
pub fn derive_api_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match check_params(&input) {
        Ok(()) => TokenStream::new(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn check_params(input: &DeriveInput) -> syn::Result<()> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "ApiParams requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ApiParams can only be derived for structs",
            ))
        }
    };

    for field in fields {
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("apivalidator")) {
            let tag: LitStr = attr.parse_args()?;
            check_tag(&tag)?;
        }
    }
    Ok(())
}

fn check_tag(tag: &LitStr) -> syn::Result<()> {
    let value = tag.value();
    for directive in value.split(',').map(str::trim) {
        let Some((key, bound)) = directive.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if (key == "min" || key == "max") && bound.trim().parse::<i64>().is_err() {
            return Err(syn::Error::new_spanned(
                tag,
                format!("`{}` expects a decimal integer, found `{}`", key, bound),
            ));
        }
    }
    Ok(())
}
