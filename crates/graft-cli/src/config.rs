//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Config file (`--config`, else the default location)
//! 3. Built-in defaults (always present)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output settings.
    pub output: OutputConfig,
    /// Installer settings.
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Never shell out to the package manager, as if `--skip-install` were
    /// always passed.
    pub skip_install: bool,
    /// Answer yes to every prompt, as if `--yes` were always passed.
    pub assume_yes: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            skip_install: false,
            assume_yes: false,
        }
    }
}

impl AppConfig {
    /// Load configuration: the file at `config_file` (or the default
    /// location) merged over built-in defaults.  A missing file is fine; a
    /// present-but-unparseable file is a configuration error.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CliError::ConfigError {
                    message: format!("cannot read {}", path.display()),
                    source: Some(Box::new(e)),
                });
            }
        };

        toml::from_str(&content).map_err(|e| CliError::ConfigError {
            message: format!("cannot parse {}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.graft.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "graft", "graft")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".graft.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let cfg = AppConfig::default();
        assert!(!cfg.output.no_color);
        assert!(!cfg.install.skip_install);
        assert!(!cfg.install.assume_yes);
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let missing = PathBuf::from("/definitely/not/a/real/config.toml");
        let cfg = AppConfig::load(Some(&missing)).unwrap();
        assert!(!cfg.install.skip_install);
    }

    #[test]
    fn load_parses_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[install]\nskip_install = true\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert!(cfg.install.skip_install);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid [ toml").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn config_path_is_non_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
