// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A few short notes on unrelated topics, each well under one chunk
#[allow(dead_code)]
pub const NOTES: &[(&str, &str)] = &[
    (
        "garden/tomatoes.md",
        "# Tomatoes\n\nWater tomatoes deeply twice a week.\nStake the vines before they flower.\n",
    ),
    (
        "kitchen/bread.md",
        "# Sourdough bread\n\nFeed the starter flour and water.\nBake the loaf in a hot oven.\n",
    ),
    (
        "travel/trains.txt",
        "Night trains to Vienna leave at ten.\nBook a sleeper cabin early.\n",
    ),
];

/// Synthetic document tree in a temporary directory
#[allow(dead_code)]
pub struct DocTree {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

#[allow(dead_code)]
impl DocTree {
    /// The standard set of short notes
    pub fn notes() -> Self {
        Self::with_files(NOTES)
    }

    /// One long markdown file spanning many chunks
    pub fn long_document(paragraphs: usize) -> Self {
        let mut content = String::from("# Field journal\n\n");
        for i in 0..paragraphs {
            content.push_str(&format!(
                "Entry {i}: observed {} birds near the river, weather {}.\n\n",
                i * 3,
                if i % 2 == 0 { "clear" } else { "rainy" }
            ));
        }
        Self::with_files(&[("journal.md", content.as_str())])
    }

    /// Create a tree with the given (relative path, content) pairs
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directories");
            }
            std::fs::write(&full_path, content).expect("Failed to write file");
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write or overwrite a file in the tree
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Remove a file from the tree
    pub fn remove(&self, path: &str) {
        std::fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");
    }
}
