//! docvec - semantic search over local document folders
//!
//! Indexes directory trees of text documents into overlapping chunks,
//! embeds them, and answers queries by exact cosine similarity.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - embedding (embedder trait, feature-hashing embedder)
//!   - indexer (file walking, chunking, incremental builds)
//!   - storage (per-index manifest, chunks and embeddings)
//!   - search (ranking, line mapping, threshold/group/merge)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Content-hash keyed embedding reuse across updates
//! - Plain-file storage that is rewritten whole on every update
//! - Deterministic ranking with per-index status reporting

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocvecError, Result};
pub use core::services::Services;
pub use core::storage::StorageManager;
pub use core::types::*;
