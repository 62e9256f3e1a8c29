//! Graft Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Graft
//! add-on installer, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            graft-cli (CLI)              │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (InstallService, Materializer, Text    │
//! │   Patcher)   Orchestrates Use Cases     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, StubSource, SourcePatcher, │
//! │      PackageInstaller, Prompt)          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    graft-adapters (Infrastructure)      │
//! │ (LocalFilesystem, EmbeddedStubs, tree-  │
//! │   sitter patcher, NpmInstaller, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │  (Edit, StubUnit, ImportSpec, Action    │
//! │   Record)    No External Dependencies   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use graft_core::application::{InstallOptions, InstallService};
//!
//! // Adapters are injected; the core never touches the real filesystem.
//! let mut service = InstallService::new(
//!     fs,        // Box<dyn Filesystem>
//!     stubs,     // Box<dyn StubSource>
//!     installer, // Box<dyn PackageInstaller>
//!     prompt,    // Box<dyn Prompt>
//!     patcher,   // Box<dyn SourcePatcher>
//!     "/path/to/project",
//!     InstallOptions::default(),
//! );
//! let report = service.run().unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InstallOptions, InstallService, Materializer, TextPatcher,
        ports::{Filesystem, PackageInstaller, Prompt, SourceHandle, SourcePatcher, StubSource},
    };
    pub use crate::domain::{
        ActionKind, ActionRecord, ConstDecl, Edit, ImportSpec, MaterializeOutcome, MethodSpec,
        PackageSpec, Position, PropertySpec, RunReport, StubCategory, StubUnit,
    };
    pub use crate::error::{GraftError, GraftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
