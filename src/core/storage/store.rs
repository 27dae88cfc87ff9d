//! Per-index artifact storage.
//!
//! Each index lives in its own directory under the base storage
//! directory and is rewritten wholesale on every update. Reads never
//! fail: missing or malformed artifacts come back empty and the caller
//! decides what that means.

use crate::core::error::{DocvecError, Result};
use crate::core::types::{ChunkRecord, Manifest};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CHUNKS_FILE: &str = "chunks.jsonl";
pub const EMBEDDINGS_FILE: &str = "embeddings.json";
pub const EXTRACTED_DIR: &str = "extracted";

/// Check that `name` is usable as an index directory name
///
/// A name must be a single normal path component, so the index
/// directory always sits directly under the storage base.
pub fn validate_index_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_component = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if name.trim().is_empty() || !single_component || name.contains(&['/', '\\'][..]) {
        return Err(DocvecError::ConfigError(format!(
            "Invalid index name '{name}': expected a plain name without path separators"
        )));
    }
    Ok(())
}

/// Artifacts of one named index
#[derive(Debug, Clone)]
pub struct VectorStore {
    name: String,
    dir: PathBuf,
}

impl VectorStore {
    /// Resolve the store for `name` under `base_dir`; touches no files
    pub fn open(base_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: base_dir.join(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory holding sidecar text for extracted documents
    pub fn extracted_dir(&self) -> PathBuf {
        self.dir.join(EXTRACTED_DIR)
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn chunks_path(&self) -> PathBuf {
        self.dir.join(CHUNKS_FILE)
    }

    fn embeddings_path(&self) -> PathBuf {
        self.dir.join(EMBEDDINGS_FILE)
    }

    /// Replace all three artifacts
    ///
    /// The manifest is written last so a reader that sees the new
    /// manifest also sees the new chunks and embeddings.
    pub fn write(
        &self,
        manifest: &Manifest,
        chunks: &[ChunkRecord],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(DocvecError::StorageError(format!(
                "Refusing to write index '{}': {} chunks but {} embeddings",
                self.name,
                chunks.len(),
                embeddings.len()
            )));
        }

        fs::create_dir_all(&self.dir)?;

        let mut writer = BufWriter::new(File::create(self.chunks_path())?);
        for chunk in chunks {
            serde_json::to_writer(&mut writer, chunk)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        let mut writer = BufWriter::new(File::create(self.embeddings_path())?);
        serde_json::to_writer(&mut writer, embeddings)?;
        writer.flush()?;

        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(self.manifest_path(), json)?;

        tracing::debug!(
            "Wrote index '{}' ({} chunks) to {:?}",
            self.name,
            chunks.len(),
            self.dir
        );
        Ok(())
    }

    /// Load the manifest, if present and well-formed
    pub fn manifest(&self) -> Option<Manifest> {
        read_json(&self.manifest_path())
    }

    /// Load chunk records in stored order
    ///
    /// A single malformed line invalidates the whole file, since the
    /// remaining records would no longer line up with the embeddings.
    pub fn chunks(&self) -> Vec<ChunkRecord> {
        let path = self.chunks_path();
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!("No chunks at {:?}: {}", path, e);
                return Vec::new();
            }
        };

        let mut chunks = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", path, e);
                    return Vec::new();
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => chunks.push(record),
                Err(e) => {
                    tracing::warn!("Malformed chunk record at {:?}:{}: {}", path, line_no + 1, e);
                    return Vec::new();
                }
            }
        }
        chunks
    }

    /// Load embedding vectors, aligned with [`chunks`](Self::chunks)
    pub fn embeddings(&self) -> Vec<Vec<f32>> {
        read_json(&self.embeddings_path()).unwrap_or_default()
    }

    /// True when any artifact exists on disk
    pub fn exists(&self) -> bool {
        self.manifest_path().exists()
            || self.chunks_path().exists()
            || self.embeddings_path().exists()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Cannot read {:?}: {}", path, e);
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Malformed JSON in {:?}: {}", path, e);
            None
        }
    }
}

/// Manages all indexes under one base directory
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Create a new storage manager
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Store for a named index
    pub fn store(&self, name: &str) -> VectorStore {
        VectorStore::open(&self.base_dir, name)
    }

    /// Check if an index has been built
    pub fn index_exists(&self, name: &str) -> bool {
        self.store(name).manifest().is_some()
    }

    /// Delete an index directory and everything in it
    ///
    /// Only directories holding a manifest are removed.
    pub fn delete_index(&self, name: &str) -> Result<()> {
        validate_index_name(name)?;
        let store = self.store(name);

        if !store.manifest_path().is_file() {
            return Err(DocvecError::IndexNotFound(name.to_string()));
        }

        fs::remove_dir_all(store.dir())?;
        tracing::info!("Deleted index '{}'", name);
        Ok(())
    }

    /// Manifests of every built index, sorted by name
    pub fn list_indexes(&self) -> Result<Vec<Manifest>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut manifests = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    if let Some(manifest) = self.store(name).manifest() {
                        manifests.push(manifest);
                    }
                }
            }
        }

        manifests.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(manifests)
    }
}
