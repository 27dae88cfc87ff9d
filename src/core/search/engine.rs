//! Exact cosine-similarity search over stored indexes.
//!
//! Every vector of every requested index is scored against the query;
//! there is no approximate index. Searches read only what is on disk
//! and keep no state between calls.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::embedding::Embedder;
use crate::core::error::{DocvecError, Result};
use crate::core::search::lines::LineIndex;
use crate::core::storage::VectorStore;
use crate::core::types::{ChunkRecord, IndexStatus, SearchHit, SearchResponse};

/// A search across one or more named indexes
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Known indexes, name to root; requested names must be present
    pub indexes: BTreeMap<String, PathBuf>,

    /// Indexes to search, in order; empty means every known index
    pub names: Vec<String>,

    /// Base storage directory
    pub base_dir: PathBuf,

    /// Query text
    pub query: String,

    /// Maximum number of hits
    pub top_k: usize,

    /// Context lines around each hit
    pub preview_lines: usize,

    /// Maximum hits taken from any single index
    pub per_index_cap: Option<usize>,
}

/// Chunks and vectors of one index that passed loading
struct LoadedIndex {
    name: String,
    status_slot: usize,
    chunks: Vec<ChunkRecord>,
    embeddings: Vec<Vec<f32>>,
}

/// A scored chunk before line mapping
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    index: usize,
    chunk: usize,
}

/// Stateless search engine
pub struct SearchEngine {
    max_k: usize,
}

impl SearchEngine {
    /// Create a search engine returning at most `max_k` hits per query
    pub fn new(max_k: usize) -> Self {
        Self { max_k }
    }

    /// Execute a search
    ///
    /// # Errors
    ///
    /// - configuration errors for a missing base directory, unknown
    ///   index names, an empty query, or `top_k == 0`
    /// - `EmbeddingFailed` if the query cannot be embedded
    ///
    /// Indexes that cannot be loaded do not fail the search; they are
    /// reported in [`SearchResponse::stats`].
    pub fn search(&self, request: &SearchRequest, embedder: &dyn Embedder) -> Result<SearchResponse> {
        let start = Instant::now();
        let names = self.validate(request)?;

        let top_k = request.top_k.min(self.max_k);
        if top_k < request.top_k {
            tracing::debug!("Clamping top_k {} to {}", request.top_k, self.max_k);
        }

        let mut stats = Vec::with_capacity(names.len());
        let mut loaded = Vec::new();
        for name in &names {
            let (status, index) = load_index(&request.base_dir, name);
            if let Some(mut index) = index {
                index.status_slot = stats.len();
                loaded.push(index);
            }
            stats.push(status);
        }

        if loaded.iter().all(|index| index.embeddings.is_empty()) {
            tracing::info!("No indexed chunks to search for query '{}'", request.query);
            return Ok(SearchResponse {
                query: request.query.clone(),
                results: Vec::new(),
                stats,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        let query_vector = embedder
            .embed_query(&request.query)
            .map_err(|e| match e {
                DocvecError::EmbeddingFailed(_) => e,
                other => DocvecError::EmbeddingFailed(other.to_string()),
            })?;
        let query_vector = normalize(&query_vector);

        let mut candidates = Vec::new();
        for (index_pos, index) in loaded.iter().enumerate() {
            if let Some(bad) = index
                .embeddings
                .iter()
                .find(|v| v.len() != query_vector.len())
            {
                tracing::warn!(
                    "Index '{}' has {}-dimensional vectors, query has {}",
                    index.name,
                    bad.len(),
                    query_vector.len()
                );
                stats[index.status_slot] = IndexStatus::degraded(
                    &index.name,
                    format!(
                        "dimension mismatch: index has {}, query has {}",
                        bad.len(),
                        query_vector.len()
                    ),
                );
                continue;
            }

            candidates.extend(index.embeddings.iter().enumerate().map(|(chunk, v)| {
                let score = dot(&query_vector, &normalize(v));
                Candidate {
                    score: if score.is_nan() { f32::NEG_INFINITY } else { score },
                    index: index_pos,
                    chunk,
                }
            }));
        }

        candidates.sort_by(|a, b| descending(a.score, b.score));

        if let Some(cap) = request.per_index_cap {
            let mut taken: HashMap<usize, usize> = HashMap::new();
            candidates.retain(|c| {
                let count = taken.entry(c.index).or_insert(0);
                *count += 1;
                *count <= cap
            });
        }
        candidates.truncate(top_k);

        let mut line_indexes: HashMap<PathBuf, Option<LineIndex>> = HashMap::new();
        let results = candidates
            .iter()
            .map(|c| {
                let index = &loaded[c.index];
                let chunk = &index.chunks[c.chunk];
                let lines = line_indexes
                    .entry(chunk.path.clone())
                    .or_insert_with(|| read_line_index(&chunk.path));
                to_hit(c.score, chunk, &index.name, lines.as_ref(), request.preview_lines)
            })
            .collect::<Vec<_>>();

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Search '{}' over {} indexes: {} results in {}ms",
            request.query,
            names.len(),
            results.len(),
            duration_ms
        );

        Ok(SearchResponse {
            query: request.query.clone(),
            results,
            stats,
            duration_ms,
        })
    }

    /// Check the request before doing any work; returns the names to
    /// search
    fn validate(&self, request: &SearchRequest) -> Result<Vec<String>> {
        if !request.base_dir.is_dir() {
            return Err(DocvecError::InvalidPath(format!(
                "Index directory does not exist: {}",
                request.base_dir.display()
            )));
        }

        if request.query.trim().is_empty() {
            return Err(DocvecError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }

        if request.top_k == 0 {
            return Err(DocvecError::InvalidQuery(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if request.names.is_empty() {
            return Ok(request.indexes.keys().cloned().collect());
        }

        for name in &request.names {
            if !request.indexes.contains_key(name) {
                return Err(DocvecError::IndexNotFound(name.clone()));
            }
        }
        Ok(request.names.clone())
    }
}

fn load_index(base_dir: &Path, name: &str) -> (IndexStatus, Option<LoadedIndex>) {
    let store = VectorStore::open(base_dir, name);
    let has_manifest = store.manifest().is_some();
    let chunks = store.chunks();
    let embeddings = store.embeddings();

    if !has_manifest && chunks.is_empty() && embeddings.is_empty() {
        tracing::warn!("Index '{}' has not been built", name);
        return (IndexStatus::degraded(name, "index has not been built"), None);
    }

    if chunks.len() != embeddings.len() {
        tracing::warn!(
            "Index '{}' has {} chunks but {} embeddings, skipping",
            name,
            chunks.len(),
            embeddings.len()
        );
        return (
            IndexStatus::degraded(
                name,
                format!(
                    "{} chunks but {} embeddings",
                    chunks.len(),
                    embeddings.len()
                ),
            ),
            None,
        );
    }

    tracing::debug!("Loaded index '{}' ({} chunks)", name, chunks.len());
    (
        IndexStatus::loaded(name, chunks.len()),
        Some(LoadedIndex {
            name: name.to_string(),
            status_slot: 0,
            chunks,
            embeddings,
        }),
    )
}

fn read_line_index(path: &Path) -> Option<LineIndex> {
    match fs::read_to_string(path) {
        Ok(text) => Some(LineIndex::new(&text)),
        Err(e) => {
            tracing::warn!("Cannot read {:?} for line mapping: {}", path, e);
            None
        }
    }
}

fn to_hit(
    score: f32,
    chunk: &ChunkRecord,
    index: &str,
    lines: Option<&LineIndex>,
    preview_lines: usize,
) -> SearchHit {
    let ((line_start, line_end), preview) = match lines {
        Some(lines) => {
            let span = lines.span(chunk.start, chunk.end);
            (span, lines.preview(span.0, span.1, preview_lines))
        }
        None => ((1, 1), Vec::new()),
    };

    SearchHit {
        score: round4(score),
        path: chunk.shown_path().to_string_lossy().into_owned(),
        line_start,
        line_end,
        index: index.to_string(),
        preview,
    }
}

/// `v / max(‖v‖, 1.0)`
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1.0);
    v.iter().map(|x| x / norm).collect()
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Stable sort by descending score; equal scores keep their order
pub fn sort_by_score(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| descending(a.score, b.score));
}
