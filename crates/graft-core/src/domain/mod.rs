//! Core domain layer for Graft.
//!
//! This module contains pure business logic with ZERO external dependencies.
//! All I/O, parsing, and process concerns are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror + serde derives
//! - **Immutable values**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Edit application and path mapping live here,
//!   not in services

pub mod action;
pub mod edit;
pub mod error;
pub mod package;
pub mod source_spec;
pub mod stub;

// Re-exports for convenience
pub use action::{ActionKind, ActionRecord, MaterializeOutcome, RunReport};
pub use edit::{Edit, Position, apply_edits};
pub use error::{DomainError, ErrorCategory};
pub use package::PackageSpec;
pub use source_spec::{ConstDecl, ImportSpec, MethodSpec, Param, PropertySpec};
pub use stub::{StubCategory, StubUnit, dest_file_name};
