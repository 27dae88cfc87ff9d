// Test helper functions

use docvec::core::config::Config;
use docvec::core::embedding::{Embedder, HashEmbedder};
use docvec::core::error::Result;
use docvec::core::services::Services;
use docvec::core::types::{EmbeddingSignature, SearchResponse, UpdateStats};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Hash embedder that counts what it is asked to embed
#[allow(dead_code)]
pub struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

#[allow(dead_code)]
impl CountingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dimension).expect("valid dimension"),
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    /// Number of `embed_batch` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of texts embedded so far
    pub fn texts(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl Embedder for CountingEmbedder {
    fn signature(&self) -> EmbeddingSignature {
        self.inner.signature()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }
}

/// Temporary data directory plus a config that points at it
#[allow(dead_code)]
pub struct TestEnv {
    pub data: TempDir,
    pub config: Config,
}

#[allow(dead_code)]
impl TestEnv {
    /// Small chunks so short fixtures still produce several of them
    pub fn new() -> Self {
        let data = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::default();
        config.storage.index_dir = data.path().join("indexes");
        config.indexing.chunk_size = 200;
        config.indexing.overlap = 20;
        config.indexing.batch_size = 4;
        config.embedding.dimension = 256;
        Self { data, config }
    }

    /// Register an index root
    pub fn with_index(mut self, name: &str, root: &Path) -> Self {
        self.config
            .indexes
            .insert(name.to_string(), root.to_path_buf());
        self
    }

    pub fn index_dir(&self) -> PathBuf {
        self.config.storage.index_dir.clone()
    }

    pub fn services(&self) -> Services {
        Services::new(self.config.clone()).expect("Failed to create services")
    }

    /// Update an index with the given embedder
    pub fn update(&self, name: &str, embedder: &dyn Embedder) -> UpdateStats {
        let services = self.services();
        let request = services
            .update_request(name)
            .expect("Failed to build update request");
        services
            .builder
            .update(&request, embedder)
            .expect("Failed to update index")
    }

    /// Search with the configured hash embedder
    pub fn search(&self, query: &str, names: &[&str], top_k: usize) -> SearchResponse {
        let services = self.services();
        let names = names.iter().map(|n| n.to_string()).collect();
        let request = services.search_request(query, names, top_k);
        services
            .search
            .search(&request, services.embedder.as_ref())
            .expect("Search failed")
    }
}

/// Assert that update stats add up
#[allow(dead_code)]
pub fn assert_valid_stats(stats: &UpdateStats) {
    assert!(stats.files > 0, "Expected files > 0, got {}", stats.files);
    assert!(
        stats.chunks >= stats.files,
        "Expected chunks ({}) >= files ({})",
        stats.chunks,
        stats.files
    );
    assert_eq!(
        stats.embedded + stats.reused,
        stats.chunks,
        "embedded + reused should cover every chunk"
    );
}
