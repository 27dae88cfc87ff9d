//! Index consistency checking.
//!
//! Compares what a manifest claims against the artifacts actually on
//! disk next to it.

use crate::core::error::{DocvecError, Result};
use crate::core::storage::StorageManager;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Index validation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Index validated
    pub name: String,

    /// Manifest values
    pub manifest_files: usize,
    pub manifest_chunks: usize,
    pub vector_dim: Option<usize>,

    /// Actual measured values
    pub chunk_records: usize,
    pub embedding_vectors: usize,
    pub distinct_paths: usize,
    pub size_bytes: u64,

    /// Validation results
    pub aligned: bool,
    pub counts_match: bool,
    pub dims_consistent: bool,
    pub is_consistent: bool,

    /// Validation timestamp
    pub validated_at: String,
}

/// Validator for stored indexes
pub struct IndexValidator<'a> {
    storage_manager: &'a StorageManager,
}

impl<'a> IndexValidator<'a> {
    /// Create a new index validator
    pub fn new(storage_manager: &'a StorageManager) -> Self {
        Self { storage_manager }
    }

    /// Validate one index against its manifest
    ///
    /// Checks:
    /// - chunk and embedding counts are equal
    /// - manifest counts match the stored chunks
    /// - every vector has the manifest's `vector_dim`
    pub fn validate_index(&self, name: &str) -> Result<ValidationReport> {
        let store = self.storage_manager.store(name);
        let manifest = store
            .manifest()
            .ok_or_else(|| DocvecError::IndexNotFound(name.to_string()))?;

        let chunks = store.chunks();
        let embeddings = store.embeddings();

        let distinct_paths = chunks
            .iter()
            .map(|c| &c.path)
            .collect::<HashSet<_>>()
            .len();

        // Files that produced no chunks are still counted in the manifest
        let counts_match =
            manifest.counts.chunks == chunks.len() && distinct_paths <= manifest.counts.files;
        let aligned = chunks.len() == embeddings.len();
        let dims_consistent = match manifest.vector_dim {
            Some(dim) => embeddings.iter().all(|v| v.len() == dim),
            None => embeddings.is_empty(),
        };

        Ok(ValidationReport {
            name: name.to_string(),
            manifest_files: manifest.counts.files,
            manifest_chunks: manifest.counts.chunks,
            vector_dim: manifest.vector_dim,
            chunk_records: chunks.len(),
            embedding_vectors: embeddings.len(),
            distinct_paths,
            size_bytes: calculate_directory_size(store.dir()),
            aligned,
            counts_match,
            dims_consistent,
            is_consistent: aligned && counts_match && dims_consistent,
            validated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Validate every built index
    pub fn validate_all(&self) -> Result<Vec<ValidationReport>> {
        let manifests = self.storage_manager.list_indexes()?;
        let mut reports = Vec::new();

        for manifest in manifests {
            match self.validate_index(&manifest.name) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!("Failed to validate index '{}': {}", manifest.name, e);
                }
            }
        }

        Ok(reports)
    }
}

/// Calculate total size of a directory recursively
fn calculate_directory_size(dir_path: &Path) -> u64 {
    if !dir_path.exists() {
        return 0;
    }

    WalkDir::new(dir_path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
