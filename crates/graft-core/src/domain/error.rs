use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid stub name '{name}': expected a '.stub' suffix")]
    InvalidStubName { name: String },

    #[error("Insert edit requires a non-empty marker")]
    EmptyMarker,

    #[error("Replace edit requires a non-empty needle")]
    EmptyNeedle,

    #[error("Import spec for '{module}' declares no bindings")]
    EmptyImport { module: String },

    #[error("Invalid module specifier: {0}")]
    InvalidModuleSpecifier(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidStubName { name } => vec![
                format!("Stub '{}' does not follow the naming rule", name),
                "Stub files must end in '.stub' (e.g. login_controller.ts.stub)".into(),
            ],
            Self::EmptyImport { module } => vec![
                format!("The import for '{}' has neither a default nor named bindings", module),
                "Declare at least one binding or drop the import".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidStubName { .. }
            | Self::EmptyMarker
            | Self::EmptyNeedle
            | Self::EmptyImport { .. }
            | Self::InvalidModuleSpecifier(_) => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
}
