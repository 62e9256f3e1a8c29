//! Text Patch Engine - load, edit, write-if-changed.
//!
//! A missing file is equivalent to empty content (the missing-but-optional
//! case); any other read failure surfaces to the caller. Content is read
//! through a run-scoped cache so a path is hit at most once per run, and a
//! file is written back at most once per step - and only when an edit
//! actually changed something, to avoid mtime churn and downstream file
//! watchers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{Edit, apply_edits},
    error::GraftResult,
};

/// Run-scoped read-through content cache, keyed by path.
///
/// First read wins; there is no invalidation because nothing else mutates
/// the target files during a single configure run. The cache is owned by
/// the orchestrator and torn down with it at run end.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<PathBuf, String>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of `path`, reading through the filesystem on first access.
    /// Absent files yield the empty string.
    pub fn load_or_default(&mut self, fs: &dyn Filesystem, path: &Path) -> GraftResult<&str> {
        if !self.entries.contains_key(path) {
            let content = fs.read_file(path)?.unwrap_or_default();
            self.entries.insert(path.to_path_buf(), content);
        }
        Ok(self.entries.get(path).map(String::as_str).unwrap_or(""))
    }

    /// Record content written during this run so later steps observe it.
    pub fn store(&mut self, path: &Path, content: String) {
        self.entries.insert(path.to_path_buf(), content);
    }
}

/// Applies idempotent edits to one file at a time.
pub struct TextPatcher {
    cache: ContentCache,
}

impl TextPatcher {
    pub fn new() -> Self {
        Self {
            cache: ContentCache::new(),
        }
    }

    /// Load `path` (empty default), apply `edits` sequentially, and write
    /// back only when something changed. Returns whether a write happened.
    #[instrument(skip(self, fs, edits), fields(path = %path.display()))]
    pub fn patch_file(
        &mut self,
        fs: &dyn Filesystem,
        path: &Path,
        edits: &[Edit],
    ) -> GraftResult<bool> {
        let content = self.cache.load_or_default(fs, path)?;
        let (next, changed) = apply_edits(content, edits);

        if !changed {
            debug!("no edits applied, leaving file untouched");
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs.create_dir_all(parent)?;
            }
        }
        fs.write_file(path, &next)?;
        self.cache.store(path, next);

        Ok(true)
    }

    /// Peek at the (cached) current content of a file without editing it.
    pub fn peek(&mut self, fs: &dyn Filesystem, path: &Path) -> GraftResult<&str> {
        self.cache.load_or_default(fs, path)
    }

    /// Record content written outside the patcher (structured patches) so
    /// later reads within the run observe it.
    pub fn store(&mut self, path: &Path, content: String) {
        self.cache.store(path, content);
    }
}

impl Default for TextPatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
