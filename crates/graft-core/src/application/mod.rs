//! Application layer for Graft.
//!
//! Orchestrates use cases (install steps) through ports. No I/O happens
//! here directly; everything goes through the traits in [`ports`].

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{
    install_service::{InstallOptions, InstallService, StepInfo},
    materializer::Materializer,
    text_patcher::{ContentCache, TextPatcher},
};
