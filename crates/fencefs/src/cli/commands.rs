use clap::{Parser, Subcommand};

/// Sandboxed filesystem operations CLI
#[derive(Parser, Debug)]
#[command(name = "fencefs")]
#[command(about = "Sandboxed filesystem operations for agent workloads")]
#[command(version)]
pub struct Cli {
    /// The operation to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Operations this binary exposes. Each variant reads its request payload
/// as JSON from stdin and writes a `FenceResponse` to stdout.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Execute a batch of copy/move/delete operations
    #[command(name = "batch-operations")]
    BatchOperations,

    /// Start watching a directory for filesystem changes
    #[command(name = "watch-directory")]
    WatchDirectory,

    /// Drain buffered events for a watch session
    #[command(name = "get-watch-events")]
    GetWatchEvents,

    /// Stop an active watch session
    #[command(name = "stop-watch")]
    StopWatch,

    /// Search a directory tree by name and/or content
    #[command(name = "search-files")]
    SearchFiles,

    /// Pre-walk a directory tree and report index statistics
    #[command(name = "build-index")]
    BuildIndex,

    /// Create a symlink inside the vetted workspace
    #[command(name = "create-symlink")]
    CreateSymlink,

    /// Compute a checksum for a file
    #[command(name = "compute-checksum")]
    ComputeChecksum,

    /// Verify a file's checksum against an expected value
    #[command(name = "verify-checksum")]
    VerifyChecksum,

    /// Report disk usage for a directory tree
    #[command(name = "analyze-disk-usage")]
    AnalyzeDiskUsage,

    /// Recursively copy a directory tree
    #[command(name = "copy-directory")]
    CopyDirectory,

    /// Recursively sync a directory tree (mirror, deleting extras)
    #[command(name = "sync-directory")]
    SyncDirectory,

    /// Administrative controls for the running policy engine
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Administrative subcommands, not part of the twelve agent-facing operations.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminAction {
    /// Toggle emergency stop / read-only mode, or clear it
    #[command(name = "emergency-stop")]
    EmergencyStop {
        /// Put the policy engine into read-only mode instead of a full halt
        #[arg(long)]
        read_only: bool,

        /// Clear an active emergency condition instead of setting one
        #[arg(long)]
        clear: bool,
    },

    /// Remove shadow backups left by delete operations older than a threshold
    #[command(name = "sweep-backups")]
    SweepBackups,
}

impl Commands {
    /// Returns the operation name used for logging, metrics, and rate limiting.
    pub fn operation_name(&self) -> &'static str {
        match self {
            Commands::BatchOperations => "batch_operations",
            Commands::WatchDirectory => "watch_directory",
            Commands::GetWatchEvents => "get_watch_events",
            Commands::StopWatch => "stop_watch",
            Commands::SearchFiles => "search_files",
            Commands::BuildIndex => "build_index",
            Commands::CreateSymlink => "create_symlink",
            Commands::ComputeChecksum => "compute_checksum",
            Commands::VerifyChecksum => "verify_checksum",
            Commands::AnalyzeDiskUsage => "analyze_disk_usage",
            Commands::CopyDirectory => "copy_directory",
            Commands::SyncDirectory => "sync_directory",
            Commands::Admin {
                action: AdminAction::EmergencyStop { .. },
            } => "admin_emergency_stop",
            Commands::Admin {
                action: AdminAction::SweepBackups,
            } => "admin_sweep_backups",
        }
    }

    /// Returns true if this command expects a JSON request body on stdin.
    pub fn expects_stdin(&self) -> bool {
        !matches!(self, Commands::Admin { .. })
    }

    /// Returns the category of this command for logging/metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Commands::BatchOperations | Commands::CopyDirectory | Commands::SyncDirectory => {
                "batch_ops"
            }
            Commands::WatchDirectory | Commands::GetWatchEvents | Commands::StopWatch => "watch",
            Commands::SearchFiles | Commands::BuildIndex => "search",
            Commands::CreateSymlink
            | Commands::ComputeChecksum
            | Commands::VerifyChecksum
            | Commands::AnalyzeDiskUsage => "aux_ops",
            Commands::Admin { .. } => "admin",
        }
    }
}

impl std::fmt::Display for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Commands::Admin {
                action: AdminAction::EmergencyStop { .. },
            } => write!(f, "admin emergency-stop"),
            Commands::Admin {
                action: AdminAction::SweepBackups,
            } => write!(f, "admin sweep-backups"),
            other => write!(f, "{}", other.operation_name().replace('_', "-")),
        }
    }
}
