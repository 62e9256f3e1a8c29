//! Implementation of the `graft steps` command.
//!
//! Prints the fixed install step sequence so users can see what `apply`
//! will do before pointing it at a project.

use graft_core::application::services::install_service::STEPS;

use crate::{
    cli::{StepsArgs, StepsFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `graft steps` command.
pub fn execute(args: StepsArgs, output: OutputManager) -> CliResult<()> {
    match args.format {
        StepsFormat::Table => print_table(&output),
        StepsFormat::List => print_list(&output),
        StepsFormat::Json => print_json(&output),
    }
}

fn print_table(output: &OutputManager) -> CliResult<()> {
    output.header("Install steps (fixed order)")?;
    let width = STEPS
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or_default();
    for (index, step) in STEPS.iter().enumerate() {
        output.print(&format!(
            "  {}. {:width$}  {}",
            index + 1,
            step.name,
            step.summary,
        ))?;
    }
    output.print("")?;
    output.print("Every step is idempotent; re-running `graft apply` is safe.")?;
    Ok(())
}

fn print_list(output: &OutputManager) -> CliResult<()> {
    for step in STEPS {
        output.print(step.name)?;
    }
    Ok(())
}

fn print_json(output: &OutputManager) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(STEPS).map_err(|e| CliError::ConfigError {
        message: "cannot serialize step list".into(),
        source: Some(Box::new(e)),
    })?;
    output.print(&rendered)?;
    Ok(())
}
