//! slimgen CLI
//!
//! Generates the typed vector wrapper header from an include directory.

use clap::Parser as ClapParser;
use slimgen::{GenError, GeneratorConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "slimgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate typed C++ vector wrappers from intrinsics headers", long_about = None)]
struct Cli {
    /// Directory containing the intrinsics headers
    include_dir: PathBuf,

    /// Output header path (overrides the configured output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generator configuration (TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slimgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => println!("Generated {}", output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf, GenError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }
    slimgen::generate_file(&cli.include_dir, &config)
}
