//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running install steps.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A patch target is absent from the project. Steps treat this as a
    /// warning and skip themselves; the run continues.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The target file exists but has no default export to anchor on.
    #[error("Cannot find the default export in {path}")]
    ExportNotFound { path: PathBuf },

    /// A named container (class, config object, array property) could not
    /// be located where the patch expected it.
    #[error("Cannot find {container} in {path}")]
    ContainerNotFound { path: PathBuf, container: String },

    /// The parser could not produce a tree for the file.
    #[error("Failed to parse {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A stub is missing from the embedded template tree.
    #[error("Stub not found in template tree: {rel}")]
    StubMissing { rel: String },

    /// The external package installer failed; its output is surfaced
    /// verbatim.
    #[error("Package installer failed ({command}): {reason}")]
    InstallFailed { command: String, reason: String },

    /// The interactive prompt could not be read.
    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceNotFound { path } => vec![
                format!("Expected to patch: {}", path.display()),
                "The step was skipped; wire the feature in manually or re-run after creating the file".into(),
            ],
            Self::ExportNotFound { path } => vec![
                format!("{} has no default export", path.display()),
                "Graft anchors its patches on the default export; restore it and re-run".into(),
            ],
            Self::ContainerNotFound { container, .. } => vec![
                format!("Could not locate: {}", container),
                "The file's structure differs from a stock project; patch it manually".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StubMissing { .. } => vec![
                "This is likely a packaging error in graft itself".into(),
                "Please report it".into(),
            ],
            Self::InstallFailed { command, .. } => vec![
                format!("Command: {}", command),
                "Ensure npm is installed and on your PATH".into(),
                "Re-run; completed steps will be skipped".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceNotFound { .. } | Self::StubMissing { .. } => ErrorCategory::NotFound,
            Self::ExportNotFound { .. }
            | Self::ContainerNotFound { .. }
            | Self::ParseFailed { .. } => ErrorCategory::MalformedTarget,
            Self::FilesystemError { .. }
            | Self::InstallFailed { .. }
            | Self::PromptFailed { .. } => ErrorCategory::Internal,
        }
    }
}
