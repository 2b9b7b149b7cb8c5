//! Generator configuration
//!
//! Defaults reproduce the stock header set and output name. A TOML file can
//! override any of them; keys it leaves out keep their defaults.
//!
//! # Example
//!
//! ```toml
//! sources = ["intrin.h", "immintrin.h"]
//! output = "include/slimmintrin.h"
//! includes = ["cstdint", "concepts", "immintrin.h"]
//!
//! [[descriptors]]
//! width = 256
//! element = "float"
//! ```

use crate::descriptor::{DEFAULT_DESCRIPTORS, TypeDescriptor};
use crate::error::GenError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Header files read from the include directory, in fold order
pub const DEFAULT_SOURCES: [&str; 4] = ["intrin.h", "xmmintrin.h", "zmmintrin.h", "immintrin.h"];

pub const DEFAULT_OUTPUT: &str = "slimmintrin.h";

pub const DEFAULT_INCLUDES: [&str; 3] = ["cstdint", "concepts", "immintrin.h"];

pub const DEFAULT_BANNER: &str = "\
// Typed vector wrappers over the platform intrinsics.
// Generated by slimgen; do not edit.

#pragma once";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub sources: Vec<String>,
    pub output: PathBuf,
    pub banner: String,
    pub includes: Vec<String>,
    /// `None` uses [`DEFAULT_DESCRIPTORS`]
    pub descriptors: Option<Vec<TypeDescriptor>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            banner: DEFAULT_BANNER.to_string(),
            includes: DEFAULT_INCLUDES.iter().map(|s| s.to_string()).collect(),
            descriptors: None,
        }
    }
}

/// On-disk form; every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    sources: Option<Vec<String>>,
    output: Option<PathBuf>,
    banner: Option<String>,
    includes: Option<Vec<String>>,
    descriptors: Option<Vec<TypeDescriptor>>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        GeneratorConfig::default()
    }

    /// Replace the header source list
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    pub fn with_includes(mut self, includes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_descriptors(mut self, descriptors: Vec<TypeDescriptor>) -> Self {
        self.descriptors = Some(descriptors);
        self
    }

    /// Descriptor table in effect
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        self.descriptors.as_deref().unwrap_or(&DEFAULT_DESCRIPTORS)
    }

    /// Parse a TOML configuration, layering it over the defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, GenError> {
        let file: ConfigFile = toml::from_str(toml_str)
            .map_err(|e| GenError::Config(format!("Failed to parse generator config: {}", e)))?;

        let mut config = GeneratorConfig::default();
        if let Some(sources) = file.sources {
            config.sources = sources;
        }
        if let Some(output) = file.output {
            config.output = output;
        }
        if let Some(banner) = file.banner {
            config.banner = banner;
        }
        if let Some(includes) = file.includes {
            config.includes = includes;
        }
        config.descriptors = file.descriptors;

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, GenError> {
        let text = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::from_toml(&text).map_err(|e| match e {
            GenError::Config(msg) => GenError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.sources.is_empty() {
            return Err(GenError::Config(
                "At least one header source is required".to_string(),
            ));
        }
        if let Some(empty) = self.sources.iter().find(|s| s.trim().is_empty()) {
            return Err(GenError::Config(format!(
                "Invalid header source name '{}'",
                empty
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(GenError::Config("Output path cannot be empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.descriptors().iter().find(|d| !seen.insert(**d)) {
            return Err(GenError::Config(format!(
                "Type {} is listed more than once in descriptors",
                dup.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ElementType::{F32, U16};
    use crate::descriptor::RegisterWidth::{W256, W512};

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(
            config.sources,
            vec!["intrin.h", "xmmintrin.h", "zmmintrin.h", "immintrin.h"]
        );
        assert_eq!(config.output, PathBuf::from("slimmintrin.h"));
        assert_eq!(config.includes, vec!["cstdint", "concepts", "immintrin.h"]);
        assert_eq!(config.descriptors().len(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .with_sources(["a.h", "b.h"])
            .with_output("out/wrappers.h")
            .with_banner("")
            .with_includes(["immintrin.h"])
            .with_descriptors(vec![TypeDescriptor::new(W256, F32)]);

        assert_eq!(config.sources, vec!["a.h", "b.h"]);
        assert_eq!(config.output, PathBuf::from("out/wrappers.h"));
        assert!(config.banner.is_empty());
        assert_eq!(config.includes, vec!["immintrin.h"]);
        assert_eq!(config.descriptors(), &[TypeDescriptor::new(W256, F32)]);
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = GeneratorConfig::from_toml(r#"output = "gen/simd.h""#).unwrap();
        assert_eq!(config.output, PathBuf::from("gen/simd.h"));
        assert_eq!(config.sources, GeneratorConfig::default().sources);
        assert_eq!(config.banner, DEFAULT_BANNER);
        assert!(config.descriptors.is_none());
    }

    #[test]
    fn test_from_toml_descriptors() {
        let config = GeneratorConfig::from_toml(
            r#"
            sources = ["immintrin.h"]

            [[descriptors]]
            width = 512
            element = "uint16_t"

            [[descriptors]]
            width = 256
            element = "float"
            "#,
        )
        .unwrap();
        assert_eq!(config.sources, vec!["immintrin.h"]);
        assert_eq!(
            config.descriptors(),
            &[TypeDescriptor::new(W512, U16), TypeDescriptor::new(W256, F32)]
        );
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        for bad in [
            "sources = []",
            r#"output = """#,
            r#"sources = ["  "]"#,
            "sources = \"intrin.h\"",
            "unknown_key = 1",
            "[[descriptors]]\nwidth = 64\nelement = \"float\"",
            "[[descriptors]]\nwidth = 128\nelement = \"half\"",
            "[[descriptors]]\nwidth = 128\nelement = \"float\"\n\
             [[descriptors]]\nwidth = 256\nelement = \"float\"\n\
             [[descriptors]]\nwidth = 128\nelement = \"float\"",
        ] {
            let err = GeneratorConfig::from_toml(bad).unwrap_err();
            assert!(matches!(err, GenError::Config(_)), "{}: {:?}", bad, err);
        }
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        let config = GeneratorConfig::new().with_descriptors(vec![
            TypeDescriptor::new(W256, F32),
            TypeDescriptor::new(W512, U16),
            TypeDescriptor::new(W256, F32),
        ]);
        match config.validate() {
            Err(GenError::Config(msg)) => assert!(msg.contains("FLOATX8"), "{}", msg),
            other => panic!("expected Config error, got {:?}", other),
        }
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slimgen.toml");
        fs::write(&path, "banner = \"// custom\"\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.banner, "// custom");

        let missing = GeneratorConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(GenError::Io { .. })));
    }
}
