//! slimgen
//!
//! Reads the platform's intrinsics headers, records which vector entry
//! points exist, and writes a C++ header of typed vector wrappers
//! (`FLOATX4`, `INT16X32`, ...) whose members are emitted only where an
//! entry point backs them.
//!
//! The pipeline has three stages:
//!
//! 1. [`catalog::load_catalog`] folds the configured sources, in order, into
//!    a [`SymbolCatalog`]
//! 2. [`Synthesizer`] turns the catalog and the descriptor table into
//!    [`Unit`]s
//! 3. [`assemble::assemble`] renders the units under a banner and includes
//!
//! ```rust,ignore
//! use slimgen::{GeneratorConfig, generate_file};
//!
//! let config = GeneratorConfig::new().with_output("include/slimmintrin.h");
//! generate_file(Path::new("/opt/msvc/include"), &config)?;
//! ```

pub mod assemble;
pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod render;
pub mod synth;
pub mod unit;

pub use catalog::{CatalogBuilder, CatalogEntry, SymbolCatalog, load_catalog};
pub use config::GeneratorConfig;
pub use descriptor::{DEFAULT_DESCRIPTORS, TypeDescriptor};
pub use error::GenError;
pub use synth::Synthesizer;
pub use unit::Unit;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Render the complete header for an already-built catalog
pub fn generate(catalog: &SymbolCatalog, config: &GeneratorConfig) -> Result<String, GenError> {
    let units = Synthesizer::new(catalog, config.descriptors()).synthesize();
    assemble::assemble(&config.banner, &config.includes, &units)
}

/// Read the configured sources from `include_dir` and render the header
pub fn generate_from_dir(include_dir: &Path, config: &GeneratorConfig) -> Result<String, GenError> {
    config.validate()?;
    let catalog = load_catalog(include_dir, &config.sources)?;
    generate(&catalog, config)
}

/// Full run: read, synthesize, and write `config.output`.
///
/// Nothing is written unless every source was read.
pub fn generate_file(include_dir: &Path, config: &GeneratorConfig) -> Result<PathBuf, GenError> {
    let text = generate_from_dir(include_dir, config)?;
    fs::write(&config.output, &text).map_err(|e| GenError::io(&config.output, e))?;
    info!("Wrote {} ({} bytes)", config.output.display(), text.len());
    Ok(config.output.clone())
}
