//! Document indexing module.
//!
//! Turns a directory of documents into a stored vector index. Key
//! features:
//!
//! - File system walking with extension, size and pattern filtering
//! - Pluggable text extraction
//! - UTF-8 safe character-based chunking with overlap
//! - Incremental updates that only embed changed chunks
//!
//! # Safety
//!
//! The chunker uses character-based slicing via `char_indices()`
//! to ensure UTF-8 safety. This prevents panics when processing
//! files containing emojis, multi-byte characters, or other
//! special Unicode sequences.

pub mod builder;
pub mod chunker;
pub mod extract;
pub mod pipeline;
pub mod walker;

pub use builder::{IndexBuilder, UpdateRequest};
pub use chunker::{content_hash, Chunker, TextWindow};
pub use extract::{Extraction, PlainTextExtractor, TextExtractor};
pub use pipeline::IndexingPipeline;
pub use walker::{DiscoveredFiles, DiscoveryOptions, FileWalker};
