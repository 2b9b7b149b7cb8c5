//! Generator error types.

use std::path::PathBuf;

/// Error type for the generator pipeline.
///
/// Only environment problems are errors. Content gaps in the headers
/// (missing intrinsics, unresolved aliases) degrade the output silently.
#[derive(Debug)]
pub enum GenError {
    /// A header source could not be read, or the output could not be written
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid or unparsable configuration
    Config(String),
    /// A formatting error while rendering generated text
    Format(std::fmt::Error),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            GenError::Config(s) => write!(f, "{}", s),
            GenError::Format(e) => write!(f, "Output rendering error: {}", e),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::Io { source, .. } => Some(source),
            GenError::Format(e) => Some(e),
            GenError::Config(_) => None,
        }
    }
}

impl From<std::fmt::Error> for GenError {
    fn from(e: std::fmt::Error) -> Self {
        GenError::Format(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = GenError::io(
            "/nowhere/intrin.h",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nowhere/intrin.h"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_format_error_conversion() {
        let err: GenError = std::fmt::Error.into();
        assert!(matches!(err, GenError::Format(_)));
    }
}
