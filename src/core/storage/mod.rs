//! Storage layer for vector indexes.
//!
//! Every named index is a directory of plain files that is replaced
//! wholesale by each update.
//!
//! # Index Storage Structure
//!
//! ```text
//! {index_dir}/
//! ├── {name-1}/
//! │   ├── manifest.json       # Index metadata
//! │   ├── chunks.jsonl        # One chunk record per line
//! │   ├── embeddings.json     # Vectors aligned with chunks.jsonl
//! │   └── extracted/          # Text sidecars for converted documents
//! └── {name-2}/
//! ```

pub mod store;
mod validator;

pub use store::{validate_index_name, StorageManager, VectorStore};
pub use validator::{IndexValidator, ValidationReport};
