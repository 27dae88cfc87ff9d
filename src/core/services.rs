//! Unified service container for docvec
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::embedding::Embedder;
use crate::core::error::Result;
use crate::core::indexer::{IndexBuilder, UpdateRequest};
use crate::core::search::{SearchEngine, SearchRequest};
use crate::core::storage::StorageManager;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Storage manager for index listing and deletion
    pub storage: Arc<StorageManager>,

    /// Builder for index updates
    pub builder: Arc<IndexBuilder>,

    /// Search engine
    pub search: Arc<SearchEngine>,

    /// Configured embedding provider
    pub embedder: Arc<dyn Embedder>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Result<Self> {
        let storage = Arc::new(StorageManager::new(config.storage.index_dir.clone()));
        let search = Arc::new(SearchEngine::new(config.search.max_k));
        let embedder: Arc<dyn Embedder> = Arc::from(config.embedding.build()?);

        Ok(Self {
            storage,
            builder: Arc::new(IndexBuilder::new()),
            search,
            embedder,
            config: Arc::new(config),
        })
    }

    /// Update request for a configured index
    pub fn update_request(&self, name: &str) -> Result<UpdateRequest> {
        let root = self.config.index_root(name)?;

        Ok(UpdateRequest {
            name: name.to_string(),
            root: root.to_path_buf(),
            base_dir: self.config.storage.index_dir.clone(),
            batch_size: self.config.indexing.batch_size,
            discovery: self.config.indexing.discovery_options(),
            chunker: self.config.indexing.chunker()?,
        })
    }

    /// Search request over the configured indexes
    ///
    /// `names` empty searches every configured index.
    pub fn search_request(&self, query: &str, names: Vec<String>, top_k: usize) -> SearchRequest {
        SearchRequest {
            indexes: self.config.indexes.clone(),
            names,
            base_dir: self.config.storage.index_dir.clone(),
            query: query.to_string(),
            top_k,
            preview_lines: self.config.search.preview_lines,
            per_index_cap: self.config.search.per_index_cap,
        }
    }
}
