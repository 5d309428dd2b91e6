//! apigen code generator
//!
//! Generates HTTP dispatch and request validation code from annotated handlers.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use apigen_gen::config::{BindingMode, DEFAULT_RUNTIME_PATH, GeneratorConfig};
use apigen_gen::errors::GeneratorError;
use apigen_gen::output::generate_file;

/// apigen generator - turns annotated handlers into dispatch and validation code
#[derive(Parser, Debug)]
#[command(name = "apigen-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rust source file containing the annotated handlers
    input: PathBuf,

    /// File to write the generated code to
    output: PathBuf,

    /// Where generated validators read parameters from
    #[arg(long, value_enum, default_value_t = BindingMode::Query)]
    binding: BindingMode,

    /// Absolute path of the runtime crate in generated code
    #[arg(long, default_value = DEFAULT_RUNTIME_PATH)]
    runtime_path: String,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,apigen_gen=info".to_string(),
            2 => "warn,apigen_gen=debug".to_string(),
            _ => "debug,apigen_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GeneratorConfig::default()
        .with_binding(cli.binding)
        .with_runtime_path(cli.runtime_path)
        .with_source_label(cli.input.display().to_string());

    let code = generate_file(&cli.input, &cli.output, &config, cli.dry_run)?;

    if cli.dry_run {
        println!("{}", code);
    }

    Ok(())
}
