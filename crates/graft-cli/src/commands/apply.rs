//! Implementation of the `graft apply` command.
//!
//! Responsibility: validate the target path, assemble the adapters, call
//! the core install service, and display the action log. No install logic
//! lives here.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use graft_adapters::{EmbeddedStubs, LocalFilesystem, NpmInstaller, TermPrompt, TsPatcher};
use graft_core::application::{InstallOptions, InstallService};

use crate::{
    cli::{ApplyArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `graft apply` command.
///
/// Dispatch sequence:
/// 1. Validate the project root
/// 2. Resolve options from flags + config
/// 3. Build adapters and the install service
/// 4. Run the step sequence
/// 5. Render the action log, warnings, and next steps
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Validate target
    let project_root = resolve_project_root(&args.path)?;

    // 2. Options: flags win over config
    let options = InstallOptions {
        skip_install: args.skip_install || config.install.skip_install,
    };
    let assume_yes = args.yes || config.install.assume_yes;

    debug!(
        skip_install = options.skip_install,
        assume_yes, "options resolved"
    );

    // 3. Assemble adapters
    let prompt = if assume_yes {
        TermPrompt::assume_yes()
    } else {
        TermPrompt::new()
    };
    let mut service = InstallService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(EmbeddedStubs::new()),
        Box::new(NpmInstaller::new(&project_root)),
        Box::new(prompt),
        Box::new(TsPatcher::new()),
        project_root.clone(),
        options,
    );

    // 4. Run
    output.header(&format!("Grafting into {}...", project_root.display()))?;
    info!(project = %project_root.display(), "apply started");

    let report = service.run().map_err(CliError::Core)?;

    info!(mutations = report.mutation_count(), "apply completed");

    // 5. Render results
    for action in &report.actions {
        output.action(action)?;
    }
    for warning in &report.warnings {
        output.warning(warning)?;
    }

    if report.is_noop() {
        output.success("Nothing to do - the project is already configured.")?;
    } else {
        output.success("Graft is all set! Visit /welcome to get started.")?;
    }

    if !global.quiet && !report.is_noop() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print("  node ace migration:run")?;
        output.print("  npm run dev")?;
    }

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Validate that the target is an existing directory.
///
/// Unlike a project generator, an installer must never create its target:
/// pointing graft at a path that does not exist is always a user mistake.
pub fn resolve_project_root(path: &Path) -> CliResult<PathBuf> {
    if !path.exists() {
        return Err(CliError::InvalidProjectRoot {
            path: path.to_path_buf(),
            reason: "does not exist".into(),
        });
    }
    if !path.is_dir() {
        return Err(CliError::InvalidProjectRoot {
            path: path.to_path_buf(),
            reason: "is not a directory".into(),
        });
    }
    Ok(path.to_path_buf())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_rejected() {
        let result = resolve_project_root(Path::new("/definitely/not/here"));
        assert!(matches!(
            result,
            Err(CliError::InvalidProjectRoot { .. })
        ));
    }

    #[test]
    fn file_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let result = resolve_project_root(&file);
        match result {
            Err(CliError::InvalidProjectRoot { reason, .. }) => {
                assert_eq!(reason, "is not a directory");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn directory_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_project_root(dir.path()).unwrap();
        assert_eq!(resolved, dir.path());
    }
}
