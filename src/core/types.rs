//! Core data types for docvec.
//!
//! Chunk records, manifests and signatures are persisted; search hits,
//! statuses and stats are ephemeral results handed back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Backend tag written into every manifest
pub const BACKEND: &str = "jsonl+json";

/// A named root directory to index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRoot {
    pub name: String,
    pub root: PathBuf,
}

/// One persisted chunk of a source file
///
/// Offsets are character offsets into the file text, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// File the chunk text was read from
    pub path: PathBuf,

    /// Character offset where the chunk starts (inclusive)
    pub start: usize,

    /// Character offset where the chunk ends (exclusive)
    pub end: usize,

    /// Content hash of the chunk text
    pub hash: String,

    /// Path to show instead of `path` (set for extracted text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_path: Option<PathBuf>,
}

impl ChunkRecord {
    /// Path shown to users for this chunk
    pub fn shown_path(&self) -> &PathBuf {
        self.display_path.as_ref().unwrap_or(&self.path)
    }
}

/// Identifies an embedding space; vectors are only reused across
/// builds when the signatures are equal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSignature {
    pub provider: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl EmbeddingSignature {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// File and chunk counts recorded in a manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCounts {
    pub files: usize,
    pub chunks: usize,
}

/// Index manifest, rewritten on every update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub root_path: PathBuf,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub embedding_model: String,
    pub embedding_signature: EmbeddingSignature,
    pub vector_dim: Option<usize>,
    pub backend: String,
    pub counts: IndexCounts,
}

/// Statistics from an index update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStats {
    /// Index name
    pub name: String,

    /// Files that produced text
    pub files: usize,

    /// Total chunks in the index
    pub chunks: usize,

    /// Chunks sent to the embedder during this update
    pub embedded: usize,

    /// Chunks whose vector was taken from the previous build
    pub reused: usize,

    /// Directory holding the index artifacts
    pub index_dir: PathBuf,

    /// True when nothing changed and storage was left untouched
    pub skipped: bool,

    /// Update duration in milliseconds
    pub duration_ms: u64,
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Cosine similarity, rounded to 4 decimals
    pub score: f32,

    /// Display path of the source file
    pub path: String,

    /// First line of the chunk (1-based, inclusive)
    pub line_start: usize,

    /// Last line of the chunk (1-based, inclusive)
    pub line_end: usize,

    /// Index the hit came from
    pub index: String,

    /// Context lines around the chunk
    pub preview: Vec<String>,
}

/// Load status of one index during a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatus {
    pub name: String,
    pub loaded: bool,
    pub chunks: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IndexStatus {
    pub fn loaded(name: &str, chunks: usize) -> Self {
        Self {
            name: name.to_string(),
            loaded: true,
            chunks,
            error: None,
        }
    }

    pub fn degraded(name: &str, error: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            loaded: false,
            chunks: 0,
            error: Some(error.into()),
        }
    }
}

/// Response from a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Original query string
    pub query: String,

    /// Ranked hits
    pub results: Vec<SearchHit>,

    /// Per-index load status
    pub stats: Vec<IndexStatus>,

    /// Query duration in milliseconds
    pub duration_ms: u64,
}
