//! Operation handler implementations.
//!
//! Each handler wires one of the twelve agent-facing operations (§6) to the
//! `fencefs-core` kernel through a shared `PolicyEngine`, and the additional
//! per-operation state it needs (`WatchRegistry`, a `SearchIndex`).

pub mod batch;
pub mod checksum;
pub mod disk_usage;
pub mod fsops;
pub mod search;
pub mod watch;

pub use batch::BatchOperationsHandler;
pub use checksum::{ComputeChecksumHandler, VerifyChecksumHandler};
pub use disk_usage::AnalyzeDiskUsageHandler;
pub use fsops::{CopyDirectoryHandler, CreateSymlinkHandler, SyncDirectoryHandler};
pub use search::{BuildIndexHandler, SearchFilesHandler};
pub use watch::{GetWatchEventsHandler, StopWatchHandler, WatchDirectoryHandler};

/// Shared helper: turn a request's raw `agent_id` string into the kernel's
/// opaque `AgentId`.
pub(crate) fn agent_of(request: &crate::io::FenceRequest) -> fencefs_core::AgentId {
    fencefs_core::AgentId::from_raw(request.agent_id.clone())
}
