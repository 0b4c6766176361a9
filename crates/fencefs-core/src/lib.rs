//! Core security and consistency kernel for fencefs
//!
//! This crate provides the sandboxed-filesystem kernel: path validation,
//! rate limiting, the policy façade, atomic batch execution, directory
//! operations, directory watching, and checksum/disk-usage/symlink
//! auxiliary operations. It carries no transport — the `fencefs` binary
//! crate turns these into CLI commands.
//!
//! # Core Components
//!
//! - **Types**: vetted paths, watch sessions/events, batch ops and rollback
//!   records, agent rate state
//! - **Error Handling**: the `SEC-*`/`VAL-*`/`FS-*`/`OP-*` taxonomy with an
//!   `ExitCode` mapping for the transport layer
//! - **Configuration**: `PolicyConfig`/`FenceConfig` loading and validation
//! - **Path Utilities**: the layered path validation pipeline
//!
//! # Example
//!
//! ```no_run
//! use fencefs_core::AgentId;
//!
//! // Create an opaque agent identity for rate-limiting and audit attribution
//! let agent_id = AgentId::generate();
//! assert!(agent_id.is_valid());
//! ```

#[macro_use]
pub mod types;
pub mod auxops;
pub mod batch;
pub mod config;
pub mod constants;
pub mod dirops;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod path;
pub mod policy;
pub mod search;
pub mod security;
pub mod watch;

// Re-export commonly used domain types
pub use types::{
    agent::{AgentId, AgentRateState},
    batch::{BatchOp, BatchOpKind, BatchOpResult, RollbackRecord},
    path::{OperationKind, VettedPath},
    watch::{FsEvent, FsEventKind, WatchSession, WatchSessionId},
};

// Re-export search types
pub use search::{FileMatch, IndexStats, SearchIndex, SearchQuery, SearchType, WalkdirSearchIndex};

// Re-export error types
pub use error::{
    ConfigError, ErrorContext, ExitCode, FenceError, FsError, IntoFenceError, OperationError,
    Result, SecurityError, ValidationError,
};

// Re-export metrics types
pub use metrics::{ExecutionStats, MemoryStats, MetricsReport, PerformanceMetrics};
