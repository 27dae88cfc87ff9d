//! Discovery, extraction and chunking for one index root.
//!
//! Produces the ordered chunk list an update works from:
//! 1. Walk directory tree
//! 2. Extract text from each file
//! 3. Chunk text
//! 4. Hash every chunk

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::error::Result;
use crate::core::indexer::chunker::content_hash;
use crate::core::indexer::{Chunker, FileWalker, TextExtractor};
use crate::core::types::ChunkRecord;

/// A chunk record together with the text it was hashed from
#[derive(Debug, Clone)]
pub struct PreparedChunk {
    pub record: ChunkRecord,
    pub text: String,
}

/// Extracted text that must be written next to the index so line
/// mapping can read it back later
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    pub path: PathBuf,
    pub text: String,
}

/// Output of [`IndexingPipeline::prepare`]
#[derive(Debug, Default)]
pub struct PreparedIndex {
    /// Chunks in discovery order
    pub chunks: Vec<PreparedChunk>,

    /// Extracted text files to persist with the index
    pub sidecars: Vec<Sidecar>,

    /// Files that produced text
    pub files: usize,

    /// Files that were discovered but yielded no text
    pub files_skipped: usize,
}

/// Orchestrates discovery and chunking
pub struct IndexingPipeline {
    walker: FileWalker,
    chunker: Chunker,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    pub fn new(walker: FileWalker, chunker: Chunker) -> Self {
        Self { walker, chunker }
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Discover, extract and chunk every file under `root`
    ///
    /// Per-file failures are logged and skipped. Text derived from
    /// another format is assigned a sidecar path under `sidecar_dir`.
    pub fn prepare(
        &self,
        root: &Path,
        extractor: &dyn TextExtractor,
        sidecar_dir: &Path,
    ) -> Result<PreparedIndex> {
        let start = Instant::now();
        tracing::info!("Starting file discovery from {:?}", root);

        let mut prepared = PreparedIndex::default();

        for (idx, file_path) in self.walker.walk(root)?.enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {} files processed", idx);
            }

            let extraction = match extractor.extract(&file_path) {
                Ok(Some(extraction)) => extraction,
                Ok(None) => {
                    prepared.files_skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", file_path, e);
                    prepared.files_skipped += 1;
                    continue;
                }
            };

            let (chunk_path, display_path) = match extraction.display_path {
                Some(display) => {
                    let sidecar = sidecar_path(sidecar_dir, &file_path);
                    prepared.sidecars.push(Sidecar {
                        path: sidecar.clone(),
                        text: extraction.text.clone(),
                    });
                    (sidecar, Some(display))
                }
                None => (file_path.clone(), None),
            };

            let windows = self.chunker.chunk(&extraction.text);
            tracing::debug!("Chunked {:?} ({} chunks)", file_path, windows.len());

            prepared.files += 1;
            prepared
                .chunks
                .extend(windows.into_iter().map(|w| PreparedChunk {
                    record: ChunkRecord {
                        path: chunk_path.clone(),
                        start: w.start,
                        end: w.end,
                        hash: content_hash(&w.text),
                        display_path: display_path.clone(),
                    },
                    text: w.text,
                }));
        }

        tracing::info!(
            "Prepared {} files ({} skipped), {} chunks in {}ms",
            prepared.files,
            prepared.files_skipped,
            prepared.chunks.len(),
            start.elapsed().as_millis()
        );

        Ok(prepared)
    }
}

/// Sidecar location for text extracted from `source`
pub fn sidecar_path(sidecar_dir: &Path, source: &Path) -> PathBuf {
    let key = content_hash(&source.to_string_lossy());
    sidecar_dir.join(format!("{key}.txt"))
}
