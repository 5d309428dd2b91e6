use std::env;
use std::path::Path;

use apigen_gen::config::GeneratorConfig;
use apigen_gen::errors::GeneratorError;
use apigen_gen::output::generate_file;

const HANDLERS: &str = "src/api.rs";

fn main() -> Result<(), GeneratorError> {
    println!("cargo:rerun-if-changed={}", HANDLERS);

    let out_dir = env::var("OUT_DIR")
        .map_err(|e| GeneratorError::ConfigError(format!("OUT_DIR is not set: {}", e)))?;
    let output = Path::new(&out_dir).join("api_handlers.rs");

    let config = GeneratorConfig::default().with_source_label(HANDLERS);
    generate_file(Path::new(HANDLERS), &output, &config, false)?;

    Ok(())
}
