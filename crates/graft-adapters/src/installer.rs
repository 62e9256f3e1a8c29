//! Package installer adapters.
//!
//! `NpmInstaller` shells out to npm / the framework's ace binary in the
//! target project. Failures carry the child's stderr verbatim; the
//! orchestrator never retries.

use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

use tracing::{info, instrument};

use graft_core::{
    application::{ApplicationError, ports::PackageInstaller},
    domain::PackageSpec,
    error::GraftResult,
};

/// Production installer driving `npm` and `node ace` as child processes.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    project_root: PathBuf,
}

impl NpmInstaller {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Run one command in the project root, surfacing stderr verbatim on
    /// failure.
    fn exec(&self, program: &str, args: &[&str]) -> GraftResult<()> {
        let rendered = format!("{program} {}", args.join(" "));
        info!(command = %rendered, "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.project_root)
            .output()
            .map_err(|e| ApplicationError::InstallFailed {
                command: rendered.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ApplicationError::InstallFailed {
                command: rendered,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl PackageInstaller for NpmInstaller {
    #[instrument(skip_all, fields(count = packages.len()))]
    fn install(&self, packages: &[PackageSpec]) -> GraftResult<()> {
        let runtime: Vec<&str> = packages
            .iter()
            .filter(|p| !p.dev)
            .map(|p| p.name.as_str())
            .collect();
        let dev: Vec<&str> = packages
            .iter()
            .filter(|p| p.dev)
            .map(|p| p.name.as_str())
            .collect();

        if !runtime.is_empty() {
            let mut args = vec!["install"];
            args.extend(&runtime);
            self.exec("npm", &args)?;
        }
        if !dev.is_empty() {
            let mut args = vec!["install", "--save-dev"];
            args.extend(&dev);
            self.exec("npm", &args)?;
        }
        Ok(())
    }

    fn configure(&self, package: &str) -> GraftResult<()> {
        // `node ace add` installs the package and runs its configure hook.
        self.exec("node", &["ace", "add", package])
    }

    fn uninstall(&self, package: &str) -> GraftResult<()> {
        self.exec("npm", &["uninstall", package])
    }
}

/// Test installer that records every call and always succeeds. Clones
/// share the call log, so tests can keep a handle while the service owns
/// its own boxed copy.
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in invocation order, rendered as human-readable strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PackageInstaller for RecordingInstaller {
    fn install(&self, packages: &[PackageSpec]) -> GraftResult<()> {
        let rendered: Vec<String> = packages.iter().map(ToString::to_string).collect();
        self.record(format!("install {}", rendered.join(", ")));
        Ok(())
    }

    fn configure(&self, package: &str) -> GraftResult<()> {
        self.record(format!("configure {package}"));
        Ok(())
    }

    fn uninstall(&self, package: &str) -> GraftResult<()> {
        self.record(format!("uninstall {package}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_installer_keeps_order() {
        let installer = RecordingInstaller::new();
        installer.configure("@adonisjs/vite").unwrap();
        installer
            .install(&[PackageSpec::dev("tailwindcss"), PackageSpec::runtime("edge-iconify")])
            .unwrap();
        installer.uninstall("@graft/jumpstart").unwrap();

        let calls = installer.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], "configure @adonisjs/vite");
        assert!(calls[1].contains("tailwindcss (dev)"));
        assert_eq!(calls[2], "uninstall @graft/jumpstart");
    }
}
