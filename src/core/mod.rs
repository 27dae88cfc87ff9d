//! Core domain logic
//!
//! Everything the `docvec` binary does lives here; the CLI only
//! parses arguments and formats output.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **embedding**: Embedder trait and the feature-hashing embedder
//! - **indexer**: File walking, chunking and incremental builds
//! - **storage**: On-disk index artifacts and validation
//! - **search**: Cosine-similarity search and hit post-processing
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocvecError, Result};
pub use services::Services;
