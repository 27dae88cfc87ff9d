//! Error types and error handling for docvec.
//!
//! Errors fall into three groups:
//!
//! - configuration problems (unknown index, bad paths, invalid
//!   settings) raised before any work begins
//! - embedding failures, fatal for the build or search that hit them
//! - storage failures on the write path
//!
//! Per-file discovery problems and per-index load problems are never
//! surfaced as errors; they are skipped or reported as status.

use thiserror::Error;

/// Result type alias for docvec operations
pub type Result<T> = std::result::Result<T, DocvecError>;

/// Main error type for docvec
#[derive(Error, Debug)]
pub enum DocvecError {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DocvecError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocvecError::IndexNotFound(_) | DocvecError::InvalidPath(_)
        )
    }

    /// Check if this error was raised while validating inputs,
    /// before any indexing or search work started
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DocvecError::IndexNotFound(_)
                | DocvecError::InvalidPath(_)
                | DocvecError::InvalidQuery(_)
                | DocvecError::ConfigError(_)
                | DocvecError::TomlError(_)
        )
    }

    /// Check if this error came from the embedding collaborator
    pub fn is_embedding_failure(&self) -> bool {
        matches!(self, DocvecError::EmbeddingFailed(_))
    }
}
