//! System-wide constants for fencefs
//!
//! Centralizes the fixed, non-overridable lists and numeric defaults the
//! specification calls out: hardcoded system paths, hardcoded sensitive
//! patterns, default policy limits, and file-naming conventions for shadow
//! backups and atomic-replace temp files.

pub mod limits;
pub mod sizes;

// =============================================================================
// Directory Structure Constants
// =============================================================================

/// Default logs directory name within a deployment's state directory.
pub const LOGS_DIR_NAME: &str = "logs";

/// Session log file name pattern (`{session_id}` placeholder).
pub const LOG_FILE_PATTERN: &str = "session-{session_id}.log";

/// Default max size, in bytes, of a single rolling log file before rotation.
pub const MAX_LOG_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default number of rotated log files kept per session.
pub const MAX_LOG_FILES_PER_SESSION: usize = 5;

// =============================================================================
// Shadow backup / atomic replace naming
// =============================================================================

/// Prefix for shadow-backup files created before a destructive batch step.
/// The full name is `<original-file-name>{SHADOW_BACKUP_PREFIX}<monotonic>`.
pub const SHADOW_BACKUP_PREFIX: &str = ".backup-";

/// Prefix for atomic-replace temp files, written alongside the target and
/// renamed into place.
pub const ATOMIC_REPLACE_TMP_PREFIX: &str = ".tmp-";

// =============================================================================
// Hardcoded system paths (§3, non-overridable)
// =============================================================================

/// Built-in, fixed list of system-path prefixes PathResolver always rejects,
/// regardless of user configuration.
pub const HARDCODED_SYSTEM_PATHS: &[&str] = &[
    "/etc",
    "/sys",
    "/proc",
    "/dev",
    "/boot",
    "/root",
    "/bin",
    "/sbin",
    "/usr/bin",
    "/usr/sbin",
    "/System",
    "/Library",
    "/Applications",
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
];

// =============================================================================
// Hardcoded sensitive patterns (§3, non-overridable)
// =============================================================================

/// Built-in, fixed list of path fragments PathResolver always rejects when
/// they appear anywhere in the resolved path. These are matched
/// case-sensitively unless listed in [`HARDCODED_SENSITIVE_PATTERNS_CI`].
pub const HARDCODED_SENSITIVE_PATTERNS: &[&str] = &[
    ".ssh/",
    ".aws/",
    ".kube/",
    "id_rsa",
    "*.pem",
    "*.key",
    "*.p12",
    "*.pfx",
    ".env",
];

/// The subset of sensitive patterns that match case-insensitively,
/// regardless of the underlying filesystem's case sensitivity.
pub const HARDCODED_SENSITIVE_PATTERNS_CI: &[&str] = &["password", "secret", "token"];

// =============================================================================
// Symlink recursion
// =============================================================================

/// Maximum symlink chain depth PathResolver will follow before rejecting
/// with `SYMLINK_ESCAPE` (§4.A, §9).
pub const SYMLINK_MAX_DEPTH: u32 = 40;

// =============================================================================
// Default policy limits (§6 configuration defaults)
// =============================================================================

/// Default `maxFileSize` in bytes (100 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 104_857_600;

/// Default `maxBatchSize` in bytes (1 GiB).
pub const DEFAULT_MAX_BATCH_SIZE: u64 = 1_073_741_824;

/// Default `maxOperationsPerMinute`.
pub const DEFAULT_MAX_OPS_PER_MINUTE: u32 = 100;

/// Default `enableAuditLog`.
pub const DEFAULT_AUDIT_ENABLED: bool = true;

/// Default `readOnly`.
pub const DEFAULT_READ_ONLY: bool = false;

/// Rolling window width for the per-minute rate limiter, in milliseconds.
pub const RATE_LIMIT_MINUTE_WINDOW_MS: i64 = 60_000;

/// Rolling window width for the optional per-hour rate limiter, in milliseconds.
pub const RATE_LIMIT_HOUR_WINDOW_MS: i64 = 3_600_000;

// =============================================================================
// Disk usage / search defaults
// =============================================================================

/// Number of largest files/subdirectories reported by `analyze_disk_usage`.
pub const DISK_USAGE_TOP_N: usize = 10;

/// Default recursion depth bound for the disk usage walker when the caller
/// does not specify one.
pub const DISK_USAGE_DEFAULT_DEPTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardcoded_lists_are_non_empty() {
        assert!(!HARDCODED_SYSTEM_PATHS.is_empty());
        assert!(!HARDCODED_SENSITIVE_PATTERNS.is_empty());
        assert!(!HARDCODED_SENSITIVE_PATTERNS_CI.is_empty());
    }

    #[test]
    fn symlink_depth_is_bounded() {
        assert_eq!(SYMLINK_MAX_DEPTH, 40);
    }

    #[test]
    fn default_limits_match_spec() {
        assert_eq!(DEFAULT_MAX_FILE_SIZE, 104_857_600);
        assert_eq!(DEFAULT_MAX_BATCH_SIZE, 1_073_741_824);
        assert_eq!(DEFAULT_MAX_OPS_PER_MINUTE, 100);
    }
}
