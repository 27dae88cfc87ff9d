//! Incremental index builds.
//!
//! An update re-chunks the whole root, then only embeds chunks whose
//! content hash has no vector in the previous build. Vectors are reused
//! only when the embedding signature is unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;

use crate::core::embedding::Embedder;
use crate::core::error::{DocvecError, Result};
use crate::core::indexer::pipeline::{PreparedIndex, Sidecar};
use crate::core::indexer::{
    Chunker, DiscoveryOptions, FileWalker, IndexingPipeline, PlainTextExtractor, TextExtractor,
};
use crate::core::storage::store::EXTRACTED_DIR;
use crate::core::storage::{validate_index_name, VectorStore};
use crate::core::types::{ChunkRecord, IndexCounts, Manifest, UpdateStats, BACKEND};

/// Everything needed to update one index
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Index name
    pub name: String,

    /// Directory to index
    pub root: PathBuf,

    /// Base storage directory; the index lives in `{base_dir}/{name}`
    pub base_dir: PathBuf,

    /// Chunks per embedder call
    pub batch_size: usize,

    /// File discovery rules
    pub discovery: DiscoveryOptions,

    /// Chunk sizing
    pub chunker: Chunker,
}

/// The previous build of an index, as far as it can be reused
struct PriorBuild {
    manifest: Option<Manifest>,
    chunks: Vec<ChunkRecord>,
    embeddings: Vec<Vec<f32>>,
    reusable: bool,
}

impl PriorBuild {
    fn load(store: &VectorStore, embedder: &dyn Embedder) -> Self {
        let manifest = store.manifest();
        let signature_matches = manifest
            .as_ref()
            .is_some_and(|m| m.embedding_signature == embedder.signature());

        if !signature_matches {
            if manifest.is_some() {
                tracing::info!(
                    "Embedding signature changed for '{}', re-embedding everything",
                    store.name()
                );
            }
            return Self {
                manifest,
                chunks: Vec::new(),
                embeddings: Vec::new(),
                reusable: false,
            };
        }

        let chunks = store.chunks();
        let embeddings = store.embeddings();
        let reusable = chunks.len() == embeddings.len();
        if !reusable {
            tracing::warn!(
                "Index '{}' has {} chunks but {} embeddings, ignoring stored vectors",
                store.name(),
                chunks.len(),
                embeddings.len()
            );
        }

        Self {
            manifest,
            chunks,
            embeddings,
            reusable,
        }
    }

    /// True when the new build would be identical to this one
    fn unchanged(&self, prepared: &PreparedIndex) -> bool {
        let Some(manifest) = &self.manifest else {
            return false;
        };

        self.reusable
            && manifest.counts.files == prepared.files
            && self.chunks.len() == prepared.chunks.len()
            && self
                .chunks
                .iter()
                .zip(&prepared.chunks)
                .all(|(old, new)| *old == new.record)
    }

    /// Map from content hash to stored vector; the first occurrence of
    /// a hash wins
    fn vectors_by_hash(&self) -> HashMap<&str, &Vec<f32>> {
        let mut map = HashMap::new();
        if self.reusable {
            for (chunk, vector) in self.chunks.iter().zip(&self.embeddings) {
                map.entry(chunk.hash.as_str()).or_insert(vector);
            }
        }
        map
    }
}

/// Builds and incrementally updates vector indexes
pub struct IndexBuilder {
    extractor: Box<dyn TextExtractor>,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    /// Builder reading files as plain UTF-8 text
    pub fn new() -> Self {
        Self {
            extractor: Box::new(PlainTextExtractor),
        }
    }

    /// Use a custom text extractor
    pub fn with_extractor(extractor: Box<dyn TextExtractor>) -> Self {
        Self { extractor }
    }

    /// Bring the index named in `request` up to date with its root
    ///
    /// # Errors
    ///
    /// - configuration errors for a bad batch size, name, or root
    /// - `EmbeddingFailed` if the embedder errors or returns the wrong
    ///   number of vectors; nothing is written in that case
    /// - storage errors while persisting
    pub fn update(&self, request: &UpdateRequest, embedder: &dyn Embedder) -> Result<UpdateStats> {
        let start = Instant::now();

        if request.batch_size == 0 {
            return Err(DocvecError::ConfigError(
                "batch_size must be > 0".to_string(),
            ));
        }
        validate_index_name(&request.name)?;

        tracing::info!("Updating index '{}' from {:?}", request.name, request.root);

        let store = VectorStore::open(&request.base_dir, &request.name);
        let pipeline = IndexingPipeline::new(
            FileWalker::new(request.discovery.clone())?,
            request.chunker.clone(),
        );
        let prepared = pipeline.prepare(
            &request.root,
            self.extractor.as_ref(),
            &store.extracted_dir(),
        )?;

        let prior = PriorBuild::load(&store, embedder);

        if prior.unchanged(&prepared) {
            tracing::info!(
                "Index '{}' is up to date ({} chunks), skipping",
                request.name,
                prepared.chunks.len()
            );
            return Ok(UpdateStats {
                name: request.name.clone(),
                files: prepared.files,
                chunks: prepared.chunks.len(),
                embedded: 0,
                reused: prepared.chunks.len(),
                index_dir: store.dir().to_path_buf(),
                skipped: true,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        let reuse = prior.vectors_by_hash();
        let mut vectors: Vec<Option<Vec<f32>>> = prepared
            .chunks
            .iter()
            .map(|c| reuse.get(c.record.hash.as_str()).map(|v| (*v).clone()))
            .collect();
        let pending: Vec<usize> = vectors
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();
        let reused = prepared.chunks.len() - pending.len();

        tracing::info!(
            "Index '{}': {} chunks, {} reused, {} to embed",
            request.name,
            prepared.chunks.len(),
            reused,
            pending.len()
        );

        for (batch_no, batch) in pending.chunks(request.batch_size).enumerate() {
            let texts: Vec<String> = batch
                .iter()
                .map(|&i| prepared.chunks[i].text.clone())
                .collect();

            let embedded = embedder.embed_batch(&texts).map_err(|e| match e {
                DocvecError::EmbeddingFailed(_) => e,
                other => DocvecError::EmbeddingFailed(other.to_string()),
            })?;

            if embedded.len() != texts.len() {
                return Err(DocvecError::EmbeddingFailed(format!(
                    "embedder returned {} vectors for {} texts",
                    embedded.len(),
                    texts.len()
                )));
            }

            tracing::debug!("Embedded batch {} ({} chunks)", batch_no + 1, texts.len());

            for (&i, vector) in batch.iter().zip(embedded) {
                vectors[i] = Some(vector);
            }
        }

        // Every slot was either reused or filled by a batch above
        let embeddings: Vec<Vec<f32>> = vectors.into_iter().flatten().collect();
        let records: Vec<ChunkRecord> = prepared.chunks.into_iter().map(|c| c.record).collect();

        let now = Utc::now();
        let manifest = Manifest {
            name: request.name.clone(),
            root_path: request.root.clone(),
            created: prior.manifest.as_ref().map_or(now, |m| m.created),
            updated: now,
            embedding_model: embedder.model_name(),
            embedding_signature: embedder.signature(),
            vector_dim: embeddings
                .first()
                .map(Vec::len)
                .or_else(|| prior.manifest.as_ref().and_then(|m| m.vector_dim)),
            backend: BACKEND.to_string(),
            counts: IndexCounts {
                files: prepared.files,
                chunks: records.len(),
            },
        };

        // Sidecars only replace the previous ones once the store write
        // has succeeded
        let staged = stage_sidecars(&store, &prepared.sidecars)?;
        if let Err(e) = store.write(&manifest, &records, &embeddings) {
            discard_staged(staged);
            return Err(e);
        }
        commit_sidecars(&store, staged)?;

        let stats = UpdateStats {
            name: request.name.clone(),
            files: prepared.files,
            chunks: records.len(),
            embedded: pending.len(),
            reused,
            index_dir: store.dir().to_path_buf(),
            skipped: false,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Index '{}' updated: {} files, {} chunks ({} embedded) in {}ms",
            stats.name,
            stats.files,
            stats.chunks,
            stats.embedded,
            stats.duration_ms
        );

        Ok(stats)
    }
}

/// Write the current extracted texts into a staging directory next to
/// the live sidecar directory
fn stage_sidecars(store: &VectorStore, sidecars: &[Sidecar]) -> Result<Option<PathBuf>> {
    let staging = store.dir().join(format!("{EXTRACTED_DIR}.staging"));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    if sidecars.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(&staging)?;
    for sidecar in sidecars {
        let file_name = sidecar.path.file_name().ok_or_else(|| {
            DocvecError::StorageError(format!("Invalid sidecar path {:?}", sidecar.path))
        })?;
        fs::write(staging.join(file_name), &sidecar.text)?;
    }
    tracing::debug!("Staged {} extracted text sidecars", sidecars.len());
    Ok(Some(staging))
}

/// Swap the staged sidecars in for the previous ones
fn commit_sidecars(store: &VectorStore, staged: Option<PathBuf>) -> Result<()> {
    let dir = store.extracted_dir();
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    if let Some(staging) = staged {
        fs::rename(&staging, &dir)?;
    }
    Ok(())
}

fn discard_staged(staged: Option<PathBuf>) {
    if let Some(staging) = staged {
        if let Err(e) = fs::remove_dir_all(&staging) {
            tracing::warn!("Failed to remove staged sidecars {:?}: {}", staging, e);
        }
    }
}
