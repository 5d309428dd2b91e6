//! Assembly, validation and file writing for generated code.
//!
//! The pipeline for one input unit:
//!
//! 1. parse the source with `syn`
//! 2. extract the [`RouteTable`](crate::descriptor::RouteTable)
//! 3. emit one `impl` block per receiver (dispatch + wrappers)
//! 4. extract field rules for referenced request types and emit validators
//! 5. validate the token stream as a Rust file and format it with `prettyplease`
//! 6. write the result atomically
//!
//! Any error aborts the run before step 6, so an existing output file is never
//! replaced by partial output.

use std::fs;
use std::path::Path;

use proc_macro2::TokenStream;
use tracing::{debug, info};

use crate::codegen::{CodegenContext, generate_receiver_impl, generate_validator};
use crate::config::GeneratorConfig;
use crate::descriptor::extract_route_table;
use crate::errors::GeneratorError;
use crate::rules::extract_rules;
use crate::scanner::record_types;

/// Assembles every generated `impl` block for a parsed unit.
///
/// Receivers come first, in encounter order, followed by the validators of
/// referenced request types in declaration order.
///
/// ## Errors
///
/// Returns the first descriptor or field rule extraction error.
pub fn assemble_unit(file: &syn::File, ctx: &CodegenContext) -> Result<TokenStream, GeneratorError> {
    let table = extract_route_table(file)?;

    let mut tokens = TokenStream::new();
    for (receiver, descriptors) in table.receivers() {
        tokens.extend(generate_receiver_impl(receiver, descriptors, ctx));
    }

    for item in record_types(file) {
        let type_name = item.ident.to_string();
        if !table.references(&type_name) {
            continue;
        }
        let rules = extract_rules(item)?;
        tokens.extend(generate_validator(&type_name, &rules, ctx));
    }

    for descriptor in table.descriptors() {
        let declared = record_types(file).any(|item| item.ident == descriptor.request_type);
        if !declared {
            debug!(
                request_type = %descriptor.request_type,
                method = %descriptor.method_name,
                "request type not declared in this unit, no validator generated"
            );
        }
    }

    Ok(tokens)
}

/// Generates the complete output unit for `source`.
///
/// Pure: reads nothing from disk and writes nothing. Identical input and
/// configuration always yield byte-identical output.
///
/// ## Errors
///
/// - `GeneratorError::ConfigError` if the configured runtime path is invalid
/// - `GeneratorError::ParseError` if `source` is not valid Rust
/// - any extraction error from [`assemble_unit`]
/// - `GeneratorError::CodeGenError` if the assembled code does not parse
pub fn generate_source(source: &str, config: &GeneratorConfig) -> Result<String, GeneratorError> {
    let ctx = CodegenContext::from_config(config)?;
    let file = syn::parse_file(source)?;
    let tokens = assemble_unit(&file, &ctx)?;
    let generated = validate_code(&tokens)?;
    Ok(format_code(&generated, config.source_label.as_deref()))
}

/// Validates generated code by parsing it with syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease, prefixed with a generated-code notice.
pub fn format_code(file: &syn::File, source_label: Option<&str>) -> String {
    let formatted = prettyplease::unparse(file);
    let notice = match source_label {
        Some(label) => format!("// Code generated by apigen-gen from {}. DO NOT EDIT.", label),
        None => "// Code generated by apigen-gen. DO NOT EDIT.".to_string(),
    };
    format!("{}\n\n{}", notice, formatted)
}

/// Writes content to a file atomically using temp file + rename.
///
/// Readers see either the old or the new content, never a mix.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if the parent directory cannot be
/// created, the temp file cannot be written, or the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Reads `input`, generates its output unit and writes it to `output`.
///
/// When the configuration has no source label, the input path is used. With
/// `dry_run` nothing is written. Either way the generated code is returned.
///
/// ## Errors
///
/// Returns `GeneratorError::ReadError` if `input` cannot be read, any error
/// from [`generate_source`], or `GeneratorError::WriteError`.
pub fn generate_file(
    input: &Path,
    output: &Path,
    config: &GeneratorConfig,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let source = fs::read_to_string(input).map_err(|e| GeneratorError::ReadError {
        path: input.display().to_string(),
        source: e,
    })?;

    let config = match config.source_label {
        Some(_) => config.clone(),
        None => config.clone().with_source_label(input.display().to_string()),
    };

    let code = generate_source(&source, &config)?;

    if dry_run {
        debug!(input = %input.display(), "dry run, output not written");
        return Ok(code);
    }

    write_atomic(output, &code)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = code.len(),
        "wrote generated handlers"
    );

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BindingMode;
    use crate::test_utils::PROFILE_SOURCE;
    use quote::quote;
    use tempfile::TempDir;

    // === generate_source tests ===

    #[test]
    fn generate_source_emits_dispatch_wrappers_and_validators() {
        let code = generate_source(PROFILE_SOURCE, &GeneratorConfig::default()).unwrap();

        assert!(code.contains("impl MyApi {"));
        assert!(code.contains("pub async fn serve_http"));
        assert!(code.contains("async fn wrap_profile(&self"));
        assert!(code.contains("async fn wrap_create(&self"));
        assert!(code.contains("impl ProfileParams {"));
        assert!(code.contains("impl CreateParams {"));
    }

    #[test]
    fn generate_source_skips_unreferenced_structs() {
        // `Unused` has an f64 field; generating a validator for it would fail.
        let code = generate_source(PROFILE_SOURCE, &GeneratorConfig::default()).unwrap();
        assert!(!code.contains("impl Unused"));
    }

    #[test]
    fn generate_source_orders_receivers_before_validators() {
        let code = generate_source(PROFILE_SOURCE, &GeneratorConfig::default()).unwrap();
        let receiver = code.find("impl MyApi {").unwrap();
        let profile = code.find("impl ProfileParams {").unwrap();
        let create = code.find("impl CreateParams {").unwrap();
        assert!(receiver < profile && profile < create);
    }

    #[test]
    fn generate_source_has_no_use_items() {
        let code = generate_source(PROFILE_SOURCE, &GeneratorConfig::default()).unwrap();
        assert!(!code.lines().any(|line| line.trim_start().starts_with("use ")));
    }

    #[test]
    fn generate_source_is_deterministic() {
        let config = GeneratorConfig::default();
        let first = generate_source(PROFILE_SOURCE, &config).unwrap();
        let second = generate_source(PROFILE_SOURCE, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn generate_source_honors_binding_mode() {
        let config = GeneratorConfig::default().with_binding(BindingMode::Form);
        let code = generate_source(PROFILE_SOURCE, &config).unwrap();
        assert!(code.contains("::apigen::form_value(req, \"login\")"));
        assert!(!code.contains("query_value"));
    }

    #[test]
    fn generate_source_without_handlers_is_empty_unit() {
        let code = generate_source("pub struct Lonely { pub a: f64 }", &GeneratorConfig::default()).unwrap();
        assert!(code.starts_with("// Code generated by apigen-gen. DO NOT EDIT."));
        assert!(!code.contains("impl"));
    }

    #[test]
    fn generate_source_rejects_invalid_rust() {
        let result = generate_source("impl {", &GeneratorConfig::default());
        assert!(matches!(result, Err(GeneratorError::ParseError(_))));
    }

    #[test]
    fn generate_source_rejects_invalid_runtime_path() {
        let config = GeneratorConfig::default().with_runtime_path("not a path");
        let result = generate_source(PROFILE_SOURCE, &config);
        assert!(matches!(result, Err(GeneratorError::ConfigError(_))));
    }

    #[test]
    fn generate_source_propagates_rule_errors() {
        let source = r#"
            pub struct Api;
            pub struct Params { #[apivalidator("min=abc")] pub n: i32 }
            impl Api {
                /// apigen:api {"url": "/n"}
                async fn n(&self, ctx: &Ctx, p: Params) -> Result<(), Error> { todo!() }
            }
        "#;
        match generate_source(source, &GeneratorConfig::default()) {
            Err(GeneratorError::InvalidBound { field, .. }) => assert_eq!(field, "n"),
            other => panic!("Expected InvalidBound, got {:?}", other),
        }
    }

    // === validate_code tests ===

    #[test]
    fn validate_code_rejects_invalid_code() {
        let invalid_tokens = quote! {
            let x =
        };

        match validate_code(&invalid_tokens) {
            Err(GeneratorError::CodeGenError(_)) => {}
            Err(other) => panic!("Unexpected error type: {:?}", other),
            Ok(_) => panic!("Expected error but got success"),
        }
    }

    // === format_code tests ===

    #[test]
    fn format_code_prepends_notice_with_label() {
        let file = validate_code(&quote!(impl A {})).unwrap();
        let formatted = format_code(&file, Some("src/api.rs"));
        assert!(formatted.starts_with("// Code generated by apigen-gen from src/api.rs. DO NOT EDIT.\n\n"));
        assert!(formatted.contains("impl A {}"));
    }

    // === write_atomic tests ===

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deep/handlers.rs");

        write_atomic(&file_path, "// Nested content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// Nested content");
    }

    #[test]
    fn write_atomic_overwrites_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("handlers.rs");
        fs::write(&file_path, "// Old content").unwrap();

        write_atomic(&file_path, "// New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// New content");
        assert!(!file_path.with_extension("tmp").exists());
    }

    // === generate_file tests ===

    #[test]
    fn generate_file_writes_output_labelled_with_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("api.rs");
        let output = temp_dir.path().join("out/handlers.rs");
        fs::write(&input, PROFILE_SOURCE).unwrap();

        let code = generate_file(&input, &output, &GeneratorConfig::default(), false).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), code);
        assert!(code.starts_with(&format!(
            "// Code generated by apigen-gen from {}. DO NOT EDIT.",
            input.display()
        )));
    }

    #[test]
    fn generate_file_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("api.rs");
        let output = temp_dir.path().join("handlers.rs");
        fs::write(&input, PROFILE_SOURCE).unwrap();

        let code = generate_file(&input, &output, &GeneratorConfig::default(), true).unwrap();

        assert!(code.contains("pub async fn serve_http"));
        assert!(!output.exists());
    }

    #[test]
    fn generate_file_missing_input_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = generate_file(
            &temp_dir.path().join("missing.rs"),
            &temp_dir.path().join("handlers.rs"),
            &GeneratorConfig::default(),
            false,
        );
        assert!(matches!(result, Err(GeneratorError::ReadError { .. })));
    }

    #[test]
    fn generate_file_failure_keeps_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("api.rs");
        let output = temp_dir.path().join("handlers.rs");
        fs::write(&input, "impl {").unwrap();
        fs::write(&output, "// previous").unwrap();

        assert!(generate_file(&input, &output, &GeneratorConfig::default(), false).is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), "// previous");
    }
}
