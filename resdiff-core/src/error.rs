//! Error types for resdiff-core.
//!
//! Extraction and diffing never fail. Errors only come from the layers around
//! them: reading files, loading a grammar, driving the parser and decoding
//! syntax snapshots.

use thiserror::Error;

/// Result type alias for resdiff-core operations.
pub type Result<T> = std::result::Result<T, DiffError>;

/// Errors that can occur around a diff run.
#[derive(Error, Debug)]
pub enum DiffError {
    /// A source or snapshot file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The grammar shared library could not be opened or lacks the symbol.
    #[error("Failed to load grammar from {path}: {message}")]
    GrammarLoad {
        /// Path of the shared library.
        path: String,
        /// Description of the loading error.
        message: String,
    },

    /// The grammar was built for a tree-sitter ABI this build cannot use.
    #[error("Incompatible grammar: {0}")]
    IncompatibleGrammar(String),

    /// tree-sitter returned no tree for a source.
    #[error("Failed to parse {path}")]
    Parse {
        /// Path (or label) of the source that failed.
        path: String,
    },

    /// Unknown single-version mode.
    #[error("Invalid change mode: '{0}' (expected 'added' or 'deleted')")]
    InvalidMode(String),

    /// Snapshot JSON decoded but does not describe a tree.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Snapshot JSON could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl DiffError {
    /// Build a read error for a path.
    pub fn read(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        DiffError::Read {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_message() {
        let err = DiffError::read(
            "src/Foo.res",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "Failed to read src/Foo.res: missing");
    }

    #[test]
    fn test_invalid_mode_message() {
        let err = DiffError::InvalidMode("renamed".to_string());
        assert!(err.to_string().contains("'renamed'"));
    }
}
