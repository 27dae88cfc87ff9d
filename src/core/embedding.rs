//! Embedding providers.
//!
//! Builds and searches only talk to an [`Embedder`]; which model sits
//! behind it is the caller's choice. [`HashEmbedder`] is a deterministic,
//! dependency-free provider based on feature hashing, used by the CLI
//! and in tests.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{DocvecError, Result};
use crate::core::types::EmbeddingSignature;

/// Turns text into fixed-dimension vectors
pub trait Embedder: Send + Sync {
    /// Identifies the embedding space. Stored vectors are only reused
    /// when the signature is unchanged.
    fn signature(&self) -> EmbeddingSignature;

    /// Human-readable model name recorded in the manifest
    fn model_name(&self) -> String {
        self.signature().model
    }

    /// Embed a batch of texts, returning exactly one vector per input
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a search query
    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| DocvecError::EmbeddingFailed("no vector returned for query".into()))
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex"));

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Feature-hashing bag-of-words embedder.
///
/// Each lowercase word token is hashed with FNV-1a; the low bits pick a
/// bucket and the top bit picks a sign. Vectors are L2-normalized
/// unless the text has no tokens, in which case they are all zeros.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const PROVIDER: &'static str = "hash";
    pub const MODEL: &'static str = "fnv1a-bow";

    /// Create an embedder producing `dimension`-sized vectors
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(DocvecError::ConfigError(
                "embedding dimension must be > 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in TOKEN_RE.find_iter(text) {
            let hash = fnv1a(token.as_str().to_lowercase().as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Embedder for HashEmbedder {
    fn signature(&self) -> EmbeddingSignature {
        EmbeddingSignature::new(Self::PROVIDER, Self::MODEL)
            .with_param("dimension", self.dimension.to_string())
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tracing::debug!("Hash-embedding batch of {} texts", texts.len());
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
