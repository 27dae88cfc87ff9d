//! Configuration management for docvec.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::embedding::{Embedder, HashEmbedder};
use crate::core::error::{DocvecError, Result};
use crate::core::indexer::{Chunker, DiscoveryOptions};
use crate::core::storage::validate_index_name;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Named index roots
    #[serde(default)]
    pub indexes: BTreeMap<String, PathBuf>,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Chunks per embedder call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum file size in bytes (skip larger files)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// File extensions to index, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// File patterns to include (glob syntax, relative to the root)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax, relative to the root)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base directory holding one subdirectory per index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Context lines shown around each hit
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,

    /// Maximum hits taken from one index
    #[serde(default)]
    pub per_index_cap: Option<usize>,

    /// Drop hits scoring below this
    #[serde(default)]
    pub min_score: Option<f32>,

    /// Merge same-file hits at most this many lines apart
    #[serde(default)]
    pub merge_gap: Option<usize>,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

// Default value functions
fn default_chunk_size() -> usize {
    3000
}

fn default_overlap() -> usize {
    300
}

fn default_batch_size() -> usize {
    64
}

fn default_max_file_bytes() -> u64 {
    crate::core::indexer::walker::DEFAULT_MAX_FILE_BYTES
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./data/indexes")
}

fn default_k() -> usize {
    8
}

fn default_max_k() -> usize {
    100
}

fn default_preview_lines() -> usize {
    2
}

fn default_provider() -> String {
    HashEmbedder::PROVIDER.to_string()
}

fn default_model() -> String {
    HashEmbedder::MODEL.to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_extensions() -> Vec<String> {
    [
        "md", "markdown", "txt", "rst", "org", "adoc", "tex", "csv", "json", "yaml", "yml",
        "toml", "html",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_excluded_dirs() -> Vec<String> {
    [
        ".git",
        "node_modules",
        "__pycache__",
        ".venv",
        "venv",
        "target",
        "dist",
        "build",
        ".cache",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            batch_size: default_batch_size(),
            max_file_bytes: default_max_file_bytes(),
            extensions: default_extensions(),
            excluded_dirs: default_excluded_dirs(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            preview_lines: default_preview_lines(),
            per_index_cap: None,
            min_score: None,
            merge_gap: None,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dimension: default_dimension(),
        }
    }
}

impl IndexingConfig {
    /// File discovery rules for an update
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            extensions: self.extensions.clone(),
            excluded_dirs: self.excluded_dirs.clone(),
            include_patterns: self.include_patterns.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
            max_file_bytes: self.max_file_bytes,
        }
    }

    pub fn chunker(&self) -> Result<Chunker> {
        Chunker::new(self.chunk_size, self.overlap)
    }
}

impl EmbeddingConfig {
    /// Build the configured embedder
    pub fn build(&self) -> Result<Box<dyn Embedder>> {
        match (self.provider.as_str(), self.model.as_str()) {
            (HashEmbedder::PROVIDER, HashEmbedder::MODEL) => {
                Ok(Box::new(HashEmbedder::new(self.dimension)?))
            }
            (provider, model) => Err(DocvecError::ConfigError(format!(
                "Unsupported embedding provider/model: {provider}/{model}"
            ))),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocvecError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg, None)
    }

    /// Load config with explicit XDG directories
    ///
    /// Config file priority order:
    /// 1. `explicit` (the `--config` flag)
    /// 2. DOCVEC_CONFIG env var
    /// 3. XDG config file (~/.config/docvec/config.toml)
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs, explicit: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else if let Ok(config_path) = env::var("DOCVEC_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else {
                Self::default()
            }
        };

        // Use the XDG data directory unless storage was set explicitly
        if env::var("DOCVEC_DATA_DIR").is_err() && config.storage.index_dir == default_index_dir()
        {
            config.storage.index_dir = xdg.indexes_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Indexing configuration
        if let Ok(chunk_size) = env::var("DOCVEC_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.indexing.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("DOCVEC_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.indexing.overlap = o;
            }
        }
        if let Ok(batch_size) = env::var("DOCVEC_BATCH_SIZE") {
            if let Ok(b) = batch_size.parse() {
                self.indexing.batch_size = b;
            }
        }

        // Storage configuration
        if let Ok(data_dir) = env::var("DOCVEC_DATA_DIR") {
            self.storage.index_dir = PathBuf::from(data_dir).join("indexes");
        }

        // Search configuration
        if let Ok(default_k) = env::var("DOCVEC_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(preview) = env::var("DOCVEC_PREVIEW_LINES") {
            if let Ok(p) = preview.parse() {
                self.search.preview_lines = p;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate indexing config
        if self.indexing.chunk_size == 0 {
            return Err(DocvecError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.indexing.overlap >= self.indexing.chunk_size {
            return Err(DocvecError::ConfigError(
                "Overlap must be less than chunk size".to_string(),
            ));
        }

        if self.indexing.batch_size == 0 {
            return Err(DocvecError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        // Validate search config
        if self.search.default_k == 0 {
            return Err(DocvecError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if self.search.default_k > self.search.max_k {
            return Err(DocvecError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(DocvecError::ConfigError(
                "Embedding dimension must be non-zero".to_string(),
            ));
        }

        // Validate index roots
        for (name, root) in &self.indexes {
            validate_index_name(name)?;
            if !root.is_absolute() {
                return Err(DocvecError::ConfigError(format!(
                    "Root of index '{name}' must be an absolute path: {}",
                    root.display()
                )));
            }
        }

        Ok(())
    }

    /// Root directory of a configured index
    pub fn index_root(&self, name: &str) -> Result<&Path> {
        self.indexes
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| DocvecError::IndexNotFound(name.to_string()))
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!("  Batch size: {}", self.indexing.batch_size);
        tracing::info!("  Max file size: {} bytes", self.indexing.max_file_bytes);
        tracing::info!("  Extensions: {} allowed", self.indexing.extensions.len());
        tracing::info!("  Index dir: {:?}", self.storage.index_dir);
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
        tracing::info!(
            "  Embedding: {}/{} ({} dims)",
            self.embedding.provider,
            self.embedding.model,
            self.embedding.dimension
        );
        tracing::info!("  Indexes: {}", self.indexes.len());
    }
}
