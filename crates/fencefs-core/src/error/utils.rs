//! Error utility functions to reduce duplication
//!
//! Helpers for constructing the `SecurityError` rejections PathResolver and
//! PolicyEngine raise most often, plus the standard audit/log message
//! strings used alongside them.

use super::{FenceError, SecurityError};

/// Build a `PATH_TRAVERSAL` rejection from the raw, unresolved input.
pub fn path_traversal_error(raw_input: impl Into<String>) -> FenceError {
    FenceError::Security(SecurityError::PathTraversal {
        raw_input: raw_input.into(),
    })
}

/// Build a `WORKSPACE_ESCAPE` rejection.
pub fn workspace_escape_error(raw_input: impl Into<String>, resolved: impl Into<String>) -> FenceError {
    FenceError::Security(SecurityError::WorkspaceEscape {
        raw_input: raw_input.into(),
        resolved: resolved.into(),
    })
}

/// Build a `SYSTEM_PATH` rejection.
pub fn system_path_error(raw_input: impl Into<String>, resolved: impl Into<String>) -> FenceError {
    FenceError::Security(SecurityError::SystemPath {
        raw_input: raw_input.into(),
        resolved: resolved.into(),
    })
}

/// Build a `SENSITIVE_FILE` rejection.
pub fn sensitive_file_error(raw_input: impl Into<String>, resolved: impl Into<String>) -> FenceError {
    FenceError::Security(SecurityError::SensitiveFile {
        raw_input: raw_input.into(),
        resolved: resolved.into(),
    })
}

/// Build a `RATE_LIMIT` rejection.
pub fn rate_limit_error(agent_id: impl Into<String>) -> FenceError {
    FenceError::Security(SecurityError::RateLimit {
        agent_id: agent_id.into(),
    })
}

/// Standard message strings shared between log lines and error displays.
pub mod messages {
    pub const PATH_TRAVERSAL_DETECTED: &str = "Path traversal attempt detected";
    pub const SENSITIVE_FILE_BLOCKED: &str = "Access to sensitive file is restricted";
    pub const SYSTEM_PATH_BLOCKED: &str = "Access to system path is restricted";
    pub const READ_ONLY_BLOCKED: &str = "Mutating operation rejected by read-only policy";
    pub const RATE_LIMIT_EXCEEDED: &str = "Agent exceeded its operation rate limit";
    pub const SYMLINK_DEPTH_EXCEEDED: &str = "Symlink recursion exceeded maximum depth";
    pub const EMERGENCY_STOP_ACTIVE: &str = "Emergency stop is active";
}
