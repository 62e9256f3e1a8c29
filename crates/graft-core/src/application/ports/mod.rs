//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the install steps need from external systems.
//! The `graft-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{ConstDecl, ImportSpec, MethodSpec, PackageSpec, PropertySpec};
use crate::error::GraftResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `graft_adapters::filesystem::LocalFilesystem` (production)
/// - `graft_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `read_file` returns `Ok(None)` for an absent file; absence is a normal
///   state for most install targets, not an error
/// - Any other read failure (permissions, I/O) surfaces as an error
pub trait Filesystem: Send + Sync {
    /// Read a file to a string; `None` when the file does not exist.
    fn read_file(&self, path: &Path) -> GraftResult<Option<String>>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> GraftResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GraftResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for the read-only template tree the add-on ships with.
///
/// Implemented by `graft_adapters::stubs::EmbeddedStubs` (include_str!).
pub trait StubSource: Send + Sync {
    /// Content of the stub at `rel`, e.g. `models/email_history.ts.stub`.
    fn read(&self, rel: &str) -> GraftResult<&str>;

    /// All stub paths under a prefix, in tree order.
    fn list(&self, prefix: &str) -> Vec<&str>;
}

/// Port for the external package manager.
///
/// Failures are fatal for the running step and surfaced verbatim; the
/// orchestrator never retries.
pub trait PackageInstaller: Send + Sync {
    /// Install the given packages into the target project.
    fn install(&self, packages: &[PackageSpec]) -> GraftResult<()>;

    /// Run the framework-level add flow for a package (install + its own
    /// configure hook).
    fn configure(&self, package: &str) -> GraftResult<()>;

    /// Remove a package from the target project.
    fn uninstall(&self, package: &str) -> GraftResult<()>;
}

/// Port for interactive confirmation.
///
/// A "no" answer is a normal outcome, never an error.
pub trait Prompt: Send + Sync {
    fn confirm(&self, message: &str) -> GraftResult<bool>;
}

/// Port for structured (syntax-tree) source patching.
///
/// Implemented by `graft_adapters::typescript::TsPatcher` (tree-sitter).
/// The handle surface is parser-agnostic: steps speak in declarations,
/// members, and module specifiers, never in parser node types.
pub trait SourcePatcher: Send + Sync {
    /// Open and parse a source file.
    ///
    /// Errors with `ApplicationError::SourceNotFound` when the file is
    /// absent (callers downgrade that to a warning) and `ParseFailed` when
    /// the parser cannot produce a tree.
    fn open(&self, fs: &dyn Filesystem, path: &Path) -> GraftResult<Box<dyn SourceHandle>>;
}

/// One parsed source file, mutated in memory and written back at most once.
///
/// Every insertion is gated on a structural presence probe, so calling any
/// of these twice is safe. Serialization uses fixed two-space indentation.
pub trait SourceHandle {
    /// Current serialized text.
    fn text(&self) -> &str;

    /// `true` once any insertion actually landed.
    fn changed(&self) -> bool;

    /// Does any import declaration target exactly this module specifier?
    fn has_import(&self, module: &str) -> bool;

    /// Add an import unless its module is already imported. Existing
    /// imports are never merged at the binding level; the specifier is the
    /// whole idempotence key. Returns whether an insertion occurred.
    fn add_import(&mut self, import: &ImportSpec) -> bool;

    /// Is there a class with this name in the file?
    fn has_class(&self, class: &str) -> bool;

    /// Does the named class contain a member (method or property) with
    /// this name? Errors with `ContainerNotFound` when the class itself is
    /// absent.
    fn has_class_member(&self, class: &str, member: &str) -> GraftResult<bool>;

    /// Insert a property at the top of the class body unless a member of
    /// that name exists.
    fn add_class_property(&mut self, class: &str, property: &PropertySpec) -> GraftResult<bool>;

    /// Append a method at the end of the class body unless a member of
    /// that name exists.
    fn add_class_method(&mut self, class: &str, method: &MethodSpec) -> GraftResult<bool>;

    /// Insert top-level `const` declarations after the last import. Each
    /// declaration is skipped when a top-level declaration of that name
    /// already exists. Returns how many were inserted.
    fn add_consts_after_imports(&mut self, decls: &[ConstDecl]) -> GraftResult<usize>;

    /// Append a block of statements at end of file, but only when `marker`
    /// does not occur anywhere in the file text. Statements are then
    /// filtered one-by-one against raw-text containment so a partially
    /// applied earlier run only receives the missing subset. Returns how
    /// many statements were appended.
    fn append_statements_if_absent(&mut self, marker: &str, statements: &[&str]) -> usize;

    /// Does the default-export configuration object hold `needle` anywhere
    /// inside its `property` array? Errors with `ExportNotFound` /
    /// `ContainerNotFound` when the anchors are missing.
    fn config_array_contains(&self, property: &str, needle: &str) -> GraftResult<bool>;

    /// Append `entry` to the `property` array of the default-export
    /// configuration object, creating the property when absent. Gated on
    /// `needle` containment. Returns whether an insertion occurred.
    fn append_config_array_entry(
        &mut self,
        property: &str,
        entry: &str,
        needle: &str,
    ) -> GraftResult<bool>;

    /// Add `name: initializer` to the default-export configuration object
    /// unless a property of that name exists. Returns whether an insertion
    /// occurred.
    fn add_config_object_property(&mut self, name: &str, initializer: &str) -> GraftResult<bool>;
}
