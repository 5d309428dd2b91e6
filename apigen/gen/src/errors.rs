//! Error types for the apigen generator.
//!
//! Every variant aborts the generator run. Recoverable failures only exist in
//! the *generated* code, where they are modelled by `apigen::ApiError`.

use thiserror::Error;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to read the input unit
    #[error("Failed to read input file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input unit is not valid Rust
    #[error("Failed to parse input source: {0}")]
    ParseError(#[from] syn::Error),

    /// The payload following the marker annotation could not be decoded.
    #[error("Invalid apigen annotation on method '{method}': {source}")]
    AnnotationError {
        /// The annotated method.
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// The `impl` block self type is not a plain named type.
    #[error("Unsupported receiver type for method '{method}': expected a plain type name, found `{found}`")]
    UnsupportedReceiver {
        /// The annotated method.
        method: String,
        /// The offending self type, rendered as source.
        found: String,
    },

    /// The handler does not take exactly a context and a request parameter.
    #[error("Method '{method}' must take exactly a context and a request parameter after `self`, found {found} parameter(s)")]
    UnexpectedParamCount {
        /// The annotated method.
        method: String,
        /// Number of non-receiver parameters found.
        found: usize,
    },

    /// The request parameter type is not a plain named type.
    #[error("Request parameter of method '{method}' must be a plain type name, found `{found}`")]
    UnsupportedParamType {
        /// The annotated method.
        method: String,
        /// The offending type, rendered as source.
        found: String,
    },

    /// A validated struct has a field outside the supported scalar kinds.
    #[error("Field '{type_name}.{field}' has unsupported type `{found}`: only String and integer fields are supported")]
    UnsupportedFieldType {
        /// The request struct.
        type_name: String,
        /// The field name.
        field: String,
        /// The offending type, rendered as source.
        found: String,
    },

    /// A `min=`/`max=` directive is not a usable integer bound.
    #[error("Invalid `{directive}` value '{value}' on field '{field}': {reason}")]
    InvalidBound {
        /// The field name.
        field: String,
        /// Either `min` or `max`.
        directive: &'static str,
        /// The raw directive value.
        value: String,
        /// Why the bound was rejected.
        reason: String,
    },

    /// The `apivalidator` attribute is not of the form `#[apivalidator("...")]`.
    #[error("Invalid apivalidator attribute on field '{field}': {source}")]
    InvalidTag {
        /// The field name.
        field: String,
        #[source]
        source: syn::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
