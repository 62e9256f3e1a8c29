//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "graft",
    bin_name = "graft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Graft an add-on onto an existing AdonisJS project",
    long_about = "Graft installs a starter add-on (auth, settings, emails, \
                  tailwind) into an existing project by copying templates and \
                  applying idempotent source patches. Re-running graft is \
                  always safe.",
    after_help = "EXAMPLES:\n\
        \x20 graft apply                 # configure the project in the CWD\n\
        \x20 graft apply ../my-app --yes\n\
        \x20 graft apply --skip-install  # offline: leave npm alone\n\
        \x20 graft steps                 # show what apply will do\n\
        \x20 graft completions bash > /usr/share/bash-completion/completions/graft",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run every install step against a target project.
    #[command(
        visible_alias = "a",
        about = "Apply the add-on to a project",
        after_help = "EXAMPLES:\n\
            \x20 graft apply\n\
            \x20 graft apply ../my-app\n\
            \x20 graft apply --yes --skip-install"
    )]
    Apply(ApplyArgs),

    /// List the fixed install step sequence.
    #[command(
        visible_alias = "ls",
        about = "List install steps",
        after_help = "EXAMPLES:\n\
            \x20 graft steps\n\
            \x20 graft steps --format json"
    )]
    Steps(StepsArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 graft completions bash > ~/.local/share/bash-completion/completions/graft\n\
            \x20 graft completions zsh  > ~/.zfunc/_graft\n\
            \x20 graft completions fish > ~/.config/fish/completions/graft.fish"
    )]
    Completions(CompletionsArgs),
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `graft apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Target project root.  Defaults to the current directory.
    #[arg(value_name = "PATH", default_value = ".", help = "Project root")]
    pub path: PathBuf,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
    pub yes: bool,

    /// Never shell out to the package manager.
    ///
    /// Missing providers and add-on packages are reported instead of
    /// installed; useful offline or in CI.
    #[arg(long = "skip-install", help = "Skip npm/ace invocations")]
    pub skip_install: bool,
}

// ── steps ─────────────────────────────────────────────────────────────────────

/// Arguments for `graft steps`.
#[derive(Debug, Args)]
pub struct StepsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: StepsFormat,
}

/// Output format for the `steps` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StepsFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `graft completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_apply_defaults_to_cwd() {
        let cli = Cli::parse_from(["graft", "apply"]);
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.path, PathBuf::from("."));
                assert!(!args.yes);
                assert!(!args.skip_install);
            }
            other => panic!("expected Apply, got {other:?}"),
        }
    }

    #[test]
    fn parse_apply_with_flags() {
        let cli = Cli::parse_from(["graft", "apply", "../my-app", "--yes", "--skip-install"]);
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.path, PathBuf::from("../my-app"));
                assert!(args.yes);
                assert!(args.skip_install);
            }
            other => panic!("expected Apply, got {other:?}"),
        }
    }

    #[test]
    fn apply_alias_works() {
        let cli = Cli::parse_from(["graft", "a"]);
        assert!(matches!(cli.command, Commands::Apply(_)));
    }

    #[test]
    fn steps_defaults_to_table() {
        let cli = Cli::parse_from(["graft", "steps"]);
        match cli.command {
            Commands::Steps(args) => assert!(matches!(args.format, StepsFormat::Table)),
            other => panic!("expected Steps, got {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["graft", "--quiet", "--verbose", "steps"]);
        assert!(result.is_err());
    }
}
