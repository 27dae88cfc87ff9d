//! Semantic search over stored vector indexes.
//!
//! Ranking is exact cosine similarity between the query vector and
//! every stored chunk vector. Hits are mapped back to line ranges of
//! their source file and can then be thresholded, grouped and merged.

pub mod engine;
mod lines;
pub mod postprocess;

pub use engine::{SearchEngine, SearchRequest};
pub use lines::LineIndex;
pub use postprocess::{apply_threshold, group_by_file, merge_adjacent, FileGroup};
