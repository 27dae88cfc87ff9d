//! File system walker with extension, size and pattern filtering.
//!
//! Traverses a directory tree lazily and yields absolute paths of
//! eligible files. Bad entries (permission denied, broken symlinks,
//! oversized files) are logged and skipped; they never stop the walk.
//!
//! Glob patterns are matched against the file's path relative to the
//! root, written with `/` separators. A pattern starting with `**/`
//! also matches at the root level, so `**/*.md` matches `notes.md`.

use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{DocvecError, Result};

/// Child name used to test whether an exclude pattern covers a
/// directory's contents
const DIR_PROBE: &str = "docvec-probe";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Default file size cap (10 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Rules deciding which files under a root are indexed
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Allowed extensions without the leading dot (empty = all)
    pub extensions: Vec<String>,

    /// Directory names pruned wherever they appear
    pub excluded_dirs: Vec<String>,

    /// Relative-path globs a file must match (empty = all)
    pub include_patterns: Vec<String>,

    /// Relative-path globs excluding files and whole directories
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in bytes (skip larger files)
    pub max_file_bytes: u64,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            excluded_dirs: Vec::new(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// A compiled glob with its optional root-level twin
#[derive(Debug, Clone)]
struct RelativeGlob {
    pattern: Pattern,
    /// `**/x` also tried as `x` so it matches at the root
    root_level: Option<Pattern>,
}

impl RelativeGlob {
    fn new(raw: &str, kind: &str) -> Result<Self> {
        let compile = |p: &str| {
            Pattern::new(p).map_err(|e| {
                DocvecError::ConfigError(format!("Invalid {kind} pattern '{raw}': {e}"))
            })
        };

        let pattern = compile(raw)?;
        let root_level = match raw.strip_prefix("**/") {
            Some(rest) if !rest.is_empty() => Some(compile(rest)?),
            _ => None,
        };

        Ok(Self {
            pattern,
            root_level,
        })
    }

    fn matches(&self, relative: &str) -> bool {
        self.pattern.matches_with(relative, MATCH_OPTIONS)
            || self
                .root_level
                .as_ref()
                .is_some_and(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

/// File system walker with extension and pattern filtering
#[derive(Debug, Clone)]
pub struct FileWalker {
    extensions: HashSet<String>,
    excluded_dirs: HashSet<String>,
    include_patterns: Vec<RelativeGlob>,
    exclude_patterns: Vec<RelativeGlob>,
    max_file_bytes: u64,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Returns
    ///
    /// A new `FileWalker`, or a configuration error if any pattern
    /// fails to compile
    pub fn new(options: DiscoveryOptions) -> Result<Self> {
        let include_patterns = options
            .include_patterns
            .iter()
            .map(|p| RelativeGlob::new(p, "include"))
            .collect::<Result<Vec<_>>>()?;

        let exclude_patterns = options
            .exclude_patterns
            .iter()
            .map(|p| RelativeGlob::new(p, "exclude"))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extensions: options
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            excluded_dirs: options.excluded_dirs.into_iter().collect(),
            include_patterns,
            exclude_patterns,
            max_file_bytes: options.max_file_bytes,
        })
    }

    /// Start walking `root`
    ///
    /// The returned iterator is lazy and can be consumed once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the root does not exist or is not a
    /// directory.
    pub fn walk(&self, root: &Path) -> Result<DiscoveredFiles<'_>> {
        let canonical_root = root.canonicalize().map_err(|e| {
            DocvecError::InvalidPath(format!("Cannot resolve root {root:?}: {e}"))
        })?;
        if !canonical_root.is_dir() {
            return Err(DocvecError::InvalidPath(format!(
                "Root {root:?} is not a directory"
            )));
        }

        let walker = WalkDir::new(&canonical_root)
            .follow_links(false)
            .sort_by_file_name();

        Ok(DiscoveredFiles {
            walker: self,
            entries: walker.into_iter(),
            root: canonical_root,
            seen: HashSet::new(),
        })
    }

    /// Collect every eligible file under `root`
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.walk(root)?.collect())
    }

    /// Determine if a directory should be descended into
    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        // Never filter the root directory
        if path == root {
            return true;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if self.excluded_dirs.contains(name) {
                tracing::debug!("Skipping excluded directory: {:?}", path);
                return false;
            }
        }

        if let Some(relative) = relative_posix(path, root) {
            // A pattern like `**/build/**` names the directory's
            // contents, so probe with a child path as well
            let child = format!("{relative}/{DIR_PROBE}");
            if self
                .exclude_patterns
                .iter()
                .any(|p| p.matches(&relative) || p.matches(&child))
            {
                tracing::debug!("Skipping excluded directory: {:?}", path);
                return false;
            }
        }

        true
    }

    /// Check a candidate file's extension and relative path
    fn accepts(&self, path: &Path, root: &Path) -> bool {
        if !self.extensions.is_empty() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase);
            match ext {
                Some(ext) if self.extensions.contains(&ext) => {}
                _ => return false,
            }
        }

        let Some(relative) = relative_posix(path, root) else {
            return false;
        };

        let included = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| p.matches(&relative));

        included && !self.exclude_patterns.iter().any(|p| p.matches(&relative))
    }

    /// Resolve a file entry and apply every check that needs I/O
    fn admit(&self, entry: &DirEntry, root: &Path) -> Option<PathBuf> {
        let path = entry.path();
        if !self.accepts(path, root) {
            return None;
        }

        let resolved = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("Skipping unresolvable file {:?}: {}", path, e);
                return None;
            }
        };

        if !resolved.starts_with(root) {
            tracing::warn!("Skipping {:?}: resolves outside of root {:?}", path, root);
            return None;
        }

        match std::fs::metadata(&resolved) {
            Ok(metadata) if !metadata.is_file() => None,
            Ok(metadata) if metadata.len() > self.max_file_bytes => {
                tracing::debug!(
                    "Skipping large file: {:?} ({} bytes)",
                    path,
                    metadata.len()
                );
                None
            }
            Ok(_) => Some(resolved),
            Err(e) => {
                tracing::debug!("Skipping unreadable file {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Lazy sequence of discovered files, produced by [`FileWalker::walk`]
pub struct DiscoveredFiles<'a> {
    walker: &'a FileWalker,
    entries: walkdir::IntoIter,
    root: PathBuf,
    /// Resolved paths already yielded; symlinks can resolve to a file
    /// that is also reached directly
    seen: HashSet<PathBuf>,
}

impl DiscoveredFiles<'_> {
    /// Canonical root being walked
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for DiscoveredFiles<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if !self.walker.should_descend(&entry, &self.root) {
                    self.entries.skip_current_dir();
                }
                continue;
            }

            if !(file_type.is_file() || file_type.is_symlink()) {
                continue;
            }

            if let Some(path) = self.walker.admit(&entry, &self.root) {
                if !self.seen.insert(path.clone()) {
                    tracing::debug!("Skipping {:?}: already discovered", entry.path());
                    continue;
                }
                return Some(path);
            }
        }
    }
}

/// Path relative to `root` with `/` separators
fn relative_posix(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
