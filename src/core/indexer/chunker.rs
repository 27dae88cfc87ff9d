//! UTF-8 safe text chunking.
//!
//! Splits text into fixed-size windows measured in **characters**.
//! Offsets reported for each window are character offsets, so they
//! stay meaningful for line mapping regardless of how many bytes a
//! character takes.
//!
//! # Example
//!
//! ```
//! use docvec::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(10, 2).unwrap();
//! let windows = chunker.chunk("Hello 👋 World 🌍 Rust 🦀");
//!
//! assert_eq!(windows.first().unwrap().start, 0);
//! assert_eq!(windows.last().unwrap().end, 22);
//! ```

use crate::core::error::{DocvecError, Result};
use sha2::{Digest, Sha256};

/// One window of chunked text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow {
    /// Character offset where the window starts (inclusive)
    pub start: usize,

    /// Character offset where the window ends (exclusive)
    pub end: usize,

    /// The window text
    pub text: String,
}

/// Fixed-size, overlapping text chunker.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Number of characters per chunk
    chunk_size: usize,

    /// Number of characters shared by consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chunk_size` is 0 or if
    /// `overlap >= chunk_size`.
    ///
    /// # Example
    ///
    /// ```
    /// use docvec::core::indexer::Chunker;
    ///
    /// let chunker = Chunker::new(3000, 300).unwrap();
    /// assert_eq!(chunker.chunk_size(), 3000);
    /// assert!(Chunker::new(100, 100).is_err());
    /// ```
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocvecError::ConfigError(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(DocvecError::ConfigError(format!(
                "overlap ({overlap}) must be < chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk text into overlapping windows.
    ///
    /// Windows cover `[0, len)` without gaps, each holds at most
    /// `chunk_size` characters, consecutive windows share exactly
    /// `overlap` characters, and the last window ends at `len`.
    /// Empty text yields no windows.
    pub fn chunk(&self, text: &str) -> Vec<TextWindow> {
        // Byte offset of every char, plus the end of the string, so
        // slicing always lands on a char boundary
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(byte_idx, _)| byte_idx)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        if char_count == 0 {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut windows = Vec::with_capacity(char_count / step + 1);
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            windows.push(TextWindow {
                start,
                end,
                text: text[boundaries[start]..boundaries[end]].to_string(),
            });

            if end == char_count {
                break;
            }
            start += step;
        }

        windows
    }
}

/// Stable content hash of a chunk's text (lowercase hex SHA-256)
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
