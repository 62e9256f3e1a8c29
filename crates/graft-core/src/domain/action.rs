//! Run outcomes and the human-readable action log.
//!
//! Every externally observable effect of an install run is captured as an
//! [`ActionRecord`]; the CLI renders the records as `create` / `skip` /
//! `update` lines. Besides the filesystem writes themselves, this log is the
//! only output of a run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Result of a single non-overwriting copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// The destination was written.
    Created,
    /// The destination was left untouched; the reason is human-readable
    /// ("already exists").
    Skipped(String),
}

impl MaterializeOutcome {
    pub fn skipped_exists() -> Self {
        Self::Skipped("already exists".into())
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

/// What kind of effect an action had on the target project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// A new file was written.
    Create,
    /// An existing file was left untouched.
    Skip,
    /// An existing file was patched in place.
    Update,
}

/// One line of the action log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub path: PathBuf,
    /// Extra context: skip reason or a short description of the patch.
    pub detail: Option<String>,
}

impl ActionRecord {
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ActionKind::Create,
            path: path.into(),
            detail: None,
        }
    }

    pub fn skip(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Skip,
            path: path.into(),
            detail: Some(reason.into()),
        }
    }

    pub fn update(path: impl Into<PathBuf>, what: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Update,
            path: path.into(),
            detail: Some(what.into()),
        }
    }

    /// `true` when the action mutated the target project.
    pub fn is_mutation(&self) -> bool {
        matches!(self.kind, ActionKind::Create | ActionKind::Update)
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match (self.kind, self.detail.as_deref()) {
            (ActionKind::Create, _) => write!(f, "create {path}"),
            (ActionKind::Skip, Some(reason)) => write!(f, "skip {path} ({reason})"),
            (ActionKind::Skip, None) => write!(f, "skip {path}"),
            (ActionKind::Update, Some(what)) => write!(f, "update {path} -> {what}"),
            (ActionKind::Update, None) => write!(f, "update {path}"),
        }
    }
}

/// Accumulated outcome of one full orchestrator run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub actions: Vec<ActionRecord>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: ActionRecord) {
        self.actions.push(action);
    }

    pub fn record_copy(&mut self, path: &Path, outcome: &MaterializeOutcome) {
        match outcome {
            MaterializeOutcome::Created => self.record(ActionRecord::create(path)),
            MaterializeOutcome::Skipped(reason) => {
                self.record(ActionRecord::skip(path, reason.clone()));
            }
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Number of actions that actually mutated the target project.
    pub fn mutation_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_mutation()).count()
    }

    /// A fully converged run: nothing left to do.
    pub fn is_noop(&self) -> bool {
        self.mutation_count() == 0
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_create() {
        let a = ActionRecord::create("app/models/user.ts");
        assert_eq!(a.to_string(), "create app/models/user.ts");
    }

    #[test]
    fn display_skip_with_reason() {
        let a = ActionRecord::skip("app/models/user.ts", "already exists");
        assert_eq!(a.to_string(), "skip app/models/user.ts (already exists)");
    }

    #[test]
    fn display_update() {
        let a = ActionRecord::update("config/app.ts", "enabled HTTP method spoofing");
        assert_eq!(
            a.to_string(),
            "update config/app.ts -> enabled HTTP method spoofing"
        );
    }

    #[test]
    fn skips_are_not_mutations() {
        let mut report = RunReport::new();
        report.record(ActionRecord::skip("a.ts", "already exists"));
        report.record(ActionRecord::skip("b.ts", "already exists"));
        assert!(report.is_noop());

        report.record(ActionRecord::create("c.ts"));
        assert_eq!(report.mutation_count(), 1);
        assert!(!report.is_noop());
    }
}
