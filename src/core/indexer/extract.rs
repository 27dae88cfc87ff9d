//! Text extraction ahead of chunking.
//!
//! Converting rich formats (PDF, office documents) to text is left to
//! callers: they plug in their own [`TextExtractor`]. The default
//! [`PlainTextExtractor`] reads UTF-8 files as-is and declines
//! anything else.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::Result;

/// Text produced for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The text to chunk
    pub text: String,

    /// Set when `text` was derived from another format; the derived
    /// text is then persisted as a sidecar and this path is shown
    pub display_path: Option<PathBuf>,
}

impl Extraction {
    /// Text read directly from the file
    pub fn plain(text: String) -> Self {
        Self {
            text,
            display_path: None,
        }
    }
}

/// Turns a discovered file into text
pub trait TextExtractor {
    /// Extract text from `path`
    ///
    /// Returns `Ok(None)` when the file has no usable text; the file
    /// is then skipped. Errors are also treated as a per-file skip by
    /// the builder.
    fn extract(&self, path: &Path) -> Result<Option<Extraction>>;
}

/// Reads files as UTF-8 text; non-UTF-8 files yield `None`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<Option<Extraction>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(Extraction::plain(text))),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::debug!("Skipping non-UTF-8 file: {:?}", path);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
