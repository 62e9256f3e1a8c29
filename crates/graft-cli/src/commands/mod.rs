//! Command handlers. Each submodule owns exactly one subcommand.

pub mod apply;
pub mod completions;
pub mod steps;
