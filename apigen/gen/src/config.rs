//! Generator configuration.
//!
//! A [`GeneratorConfig`] is fixed for one generator run. It controls where the
//! generated validators read request parameters from and how the generated
//! code refers to the runtime crate.

use clap::ValueEnum;

use crate::errors::GeneratorError;

/// Default absolute path of the runtime crate used by generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::apigen";

/// Where generated validators look up external parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BindingMode {
    /// Read values from the URL query string only.
    #[default]
    Query,
    /// Read values from an urlencoded request body, falling back to the query string.
    Form,
}

impl BindingMode {
    /// Name of the runtime lookup function for this mode.
    pub fn lookup_fn(self) -> &'static str {
        match self {
            Self::Query => "query_value",
            Self::Form => "form_value",
        }
    }
}

/// Configuration for a single generator run.
///
/// ## Examples
///
/// ```
/// use apigen_gen::config::{BindingMode, GeneratorConfig};
///
/// let config = GeneratorConfig::default()
///     .with_binding(BindingMode::Form)
///     .with_source_label("src/api.rs");
///
/// assert_eq!(config.binding, BindingMode::Form);
/// assert!(config.runtime_path().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Parameter binding mode for every generated validator.
    pub binding: BindingMode,
    /// Absolute path of the runtime crate, e.g. `::apigen`.
    pub runtime_path: String,
    /// Name of the input unit, shown in the generated-code notice.
    pub source_label: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            binding: BindingMode::default(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            source_label: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_binding(mut self, binding: BindingMode) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// Parses the configured runtime path.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` if the path is not a valid Rust path.
    pub fn runtime_path(&self) -> Result<syn::Path, GeneratorError> {
        syn::parse_str::<syn::Path>(&self.runtime_path).map_err(|e| {
            GeneratorError::ConfigError(format!(
                "runtime path '{}' is not a valid Rust path: {}",
                self.runtime_path, e
            ))
        })
    }
}
