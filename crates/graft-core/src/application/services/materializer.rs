//! File Materializer - non-overwriting template copies.
//!
//! Copies a stub (or a whole stub directory) into the target project. An
//! existing destination file is the idempotence gate: it is never touched
//! and the copy reports `Skipped("already exists")`. Any other I/O failure
//! is fatal for the running step; a partially materialized directory is
//! acceptable because the next run resumes by skipping what already landed.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::ports::{Filesystem, StubSource},
    domain::{MaterializeOutcome, StubUnit, dest_file_name},
    error::GraftResult,
};

/// Copies template units through the stub and filesystem ports.
pub struct Materializer<'a> {
    stubs: &'a dyn StubSource,
    fs: &'a dyn Filesystem,
}

impl<'a> Materializer<'a> {
    pub fn new(stubs: &'a dyn StubSource, fs: &'a dyn Filesystem) -> Self {
        Self { stubs, fs }
    }

    /// Materialize a single stub unit into the project.
    #[instrument(skip(self), fields(stub = %unit.stub_path()))]
    pub fn materialize_unit(
        &self,
        unit: &StubUnit,
        project_root: &Path,
    ) -> GraftResult<(PathBuf, MaterializeOutcome)> {
        let dest = unit.dest_path(project_root);
        let outcome = self.copy(&unit.stub_path(), &dest)?;
        Ok((dest, outcome))
    }

    /// Materialize every stub under `prefix` into `dest_dir`, preserving
    /// the relative layout. Each file is independently skippable.
    #[instrument(skip(self))]
    pub fn materialize_dir(
        &self,
        prefix: &str,
        dest_dir: &Path,
    ) -> GraftResult<Vec<(PathBuf, MaterializeOutcome)>> {
        let mut results = Vec::new();

        for rel in self.stubs.list(prefix) {
            let tail = rel.strip_prefix(prefix).unwrap_or(rel);
            let tail = tail.trim_start_matches('/');
            let dest = join_renamed(dest_dir, tail);
            let outcome = self.copy(rel, &dest)?;
            results.push((dest, outcome));
        }

        Ok(results)
    }

    /// The non-overwriting copy primitive.
    fn copy(&self, stub_rel: &str, dest: &Path) -> GraftResult<MaterializeOutcome> {
        if self.fs.exists(dest) {
            debug!(dest = %dest.display(), "destination exists, skipping");
            return Ok(MaterializeOutcome::skipped_exists());
        }

        let content = self.stubs.read(stub_rel)?;

        if let Some(parent) = dest.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write_file(dest, content)?;

        debug!(dest = %dest.display(), "materialized");
        Ok(MaterializeOutcome::Created)
    }
}

/// Join a relative stub path onto `dest_dir`, stripping the `.stub` suffix
/// from the file name component.
fn join_renamed(dest_dir: &Path, tail: &str) -> PathBuf {
    let rel = Path::new(tail);
    let mut dest = dest_dir.to_path_buf();
    if let Some(parent) = rel.parent() {
        if !parent.as_os_str().is_empty() {
            dest = dest.join(parent);
        }
    }
    let name = rel.file_name().and_then(|n| n.to_str()).unwrap_or(tail);
    dest.join(dest_file_name(name))
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_join_strips_stub_suffix() {
        assert_eq!(
            join_renamed(Path::new("resources/views"), "pages/home.edge.stub"),
            PathBuf::from("resources/views/pages/home.edge")
        );
    }

    #[test]
    fn renamed_join_keeps_plain_names() {
        assert_eq!(
            join_renamed(Path::new("resources/views"), "components/toast.edge"),
            PathBuf::from("resources/views/components/toast.edge")
        );
    }
}
