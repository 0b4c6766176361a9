//! Path validation and normalization for fencefs.
//!
//! This module is organized around two layers:
//! - **[`resolver::PathResolver`]**: the fixed, ten-layer validation
//!   pipeline that turns a raw, caller-supplied path into a
//!   [`crate::types::path::VettedPath`] or a `SecurityError` rejection.
//! - **Normalization utilities** ([`normalize_path`], [`paths_equal`],
//!   [`relative_path`]): cross-platform path cleaning used by the resolver
//!   and by callers that just need consistent path comparison.
//!
//! # Security Model
//!
//! - **Fail closed**: every unresolved path is denied by default.
//! - **Defense in depth**: the lexical screen, canonicalization, and the
//!   hardcoded system/sensitive-pattern checks are non-overridable layers
//!   that run before any user-configured policy is consulted.
//! - **Zero trust**: every input path — even ones that look benign — goes
//!   through the full pipeline; there is no fast path around it.
//!
//! # Quick Start
//!
//! ```rust
//! use fencefs_core::config::PolicyConfig;
//! use fencefs_core::path::resolver::PathResolver;
//! use fencefs_core::types::path::OperationKind;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = std::env::temp_dir();
//! let policy = PolicyConfig::for_workspace(workspace.clone());
//! let resolver = PathResolver::new();
//!
//! let vetted = resolver.resolve(&PathBuf::from("notes.txt"), OperationKind::Read, &policy)?;
//! println!("safe to access: {}", vetted);
//! # Ok(())
//! # }
//! ```

pub mod resolver;
pub mod utils;

pub use resolver::PathResolver;
pub use utils::{normalize_path, paths_equal, relative_path};
