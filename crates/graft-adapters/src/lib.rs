//! Infrastructure adapters for Graft.
//!
//! This crate implements the ports defined in `graft_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod installer;
pub mod prompt;
pub mod stubs;
pub mod typescript;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use installer::{NpmInstaller, RecordingInstaller};
pub use prompt::{ScriptedPrompt, TermPrompt};
pub use stubs::EmbeddedStubs;
pub use typescript::TsPatcher;
