//! Template units and the stub → destination naming rule.
//!
//! A stub is identified by its path relative to the embedded stub tree,
//! grouped under a category prefix (`views/`, `models/`, ...). The
//! destination is fully determined by the category's target directory plus
//! the file name with the trailing `.stub` suffix stripped:
//!
//! ```text
//! controllers/auth/login_controller.ts.stub
//!   -> app/controllers/auth/login_controller.ts
//! ```
//!
//! The mapping is deterministic (no timestamps, no counters): a re-run
//! resolves to the same destination, which is what lets the non-overwrite
//! gate hold.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// Destination category for a template unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StubCategory {
    Views,
    Models,
    Controllers,
    Migrations,
    Validators,
    Services,
    Preloads,
}

impl StubCategory {
    /// Prefix of this category inside the stub tree.
    pub fn stub_prefix(&self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Models => "models",
            Self::Controllers => "controllers",
            Self::Migrations => "migrations",
            Self::Validators => "validators",
            Self::Services => "services",
            Self::Preloads => "start",
        }
    }

    /// Destination directory relative to the target project root.
    pub fn dest_dir(&self) -> &'static str {
        match self {
            Self::Views => "resources/views",
            Self::Models => "app/models",
            Self::Controllers => "app/controllers",
            Self::Migrations => "database/migrations",
            Self::Validators => "app/validators",
            Self::Services => "app/services",
            Self::Preloads => "start",
        }
    }
}

/// Strip the trailing `.stub` suffix from a stub file name.
///
/// `login_controller.ts.stub` -> `login_controller.ts`; names without the
/// suffix are returned unchanged (directory copies contain plain files).
pub fn dest_file_name(stub_name: &str) -> String {
    stub_name
        .strip_suffix(".stub")
        .unwrap_or(stub_name)
        .to_string()
}

/// One template unit: a category plus a path relative to that category's
/// prefix in the stub tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubUnit {
    pub category: StubCategory,
    pub rel: String,
}

impl StubUnit {
    /// A single-file unit; the relative path must carry the `.stub` suffix.
    pub fn file(category: StubCategory, rel: impl Into<String>) -> Result<Self, DomainError> {
        let rel = rel.into();
        if !rel.ends_with(".stub") {
            return Err(DomainError::InvalidStubName { name: rel });
        }
        Ok(Self { category, rel })
    }

    /// Path of the stub inside the stub tree.
    pub fn stub_path(&self) -> String {
        format!("{}/{}", self.category.stub_prefix(), self.rel)
    }

    /// Destination path inside the target project.
    pub fn dest_path(&self, project_root: &Path) -> PathBuf {
        let mut dest = project_root.join(self.category.dest_dir());
        let rel = Path::new(&self.rel);
        if let Some(parent) = rel.parent() {
            if !parent.as_os_str().is_empty() {
                dest = dest.join(parent);
            }
        }
        let name = rel
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(self.rel.as_str());
        dest.join(dest_file_name(name))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_stripped_once() {
        assert_eq!(dest_file_name("user.ts.stub"), "user.ts");
        assert_eq!(dest_file_name("home.edge.stub"), "home.edge");
        assert_eq!(dest_file_name("home.edge"), "home.edge");
    }

    #[test]
    fn nested_controller_maps_into_app_controllers() {
        let unit = StubUnit::file(StubCategory::Controllers, "auth/login_controller.ts.stub")
            .unwrap();
        assert_eq!(unit.stub_path(), "controllers/auth/login_controller.ts.stub");
        assert_eq!(
            unit.dest_path(Path::new("/proj")),
            PathBuf::from("/proj/app/controllers/auth/login_controller.ts")
        );
    }

    #[test]
    fn migration_name_is_deterministic() {
        let unit = StubUnit::file(
            StubCategory::Migrations,
            "create_email_histories_table.ts.stub",
        )
        .unwrap();
        let first = unit.dest_path(Path::new("."));
        let second = unit.dest_path(Path::new("."));
        assert_eq!(first, second);
        assert_eq!(
            first,
            PathBuf::from("./database/migrations/create_email_histories_table.ts")
        );
    }

    #[test]
    fn preload_stub_maps_into_start() {
        let unit = StubUnit::file(StubCategory::Preloads, "globals.ts.stub").unwrap();
        assert_eq!(
            unit.dest_path(Path::new("/proj")),
            PathBuf::from("/proj/start/globals.ts")
        );
    }

    #[test]
    fn missing_stub_suffix_is_rejected() {
        let unit = StubUnit::file(StubCategory::Models, "user.ts");
        assert!(matches!(unit, Err(DomainError::InvalidStubName { .. })));
    }
}
