//! Error handling for fencefs
//!
//! Comprehensive error types with `thiserror`, an `ExitCode` mapping for the
//! CLI transport, and error-context utilities for propagating "which op,
//! which path" context without losing the original error's exit code.

pub mod utils;

use thiserror::Error;

/// Convenient result alias for fencefs operations.
///
/// # Examples
///
/// ```
/// use fencefs_core::error::{Result, FenceError};
///
/// fn do_work(ok: bool) -> Result<()> {
///     if ok { Ok(()) } else { Err(FenceError::InvalidInput { message: "bad".into() }) }
/// }
///
/// assert!(do_work(true).is_ok());
/// assert!(do_work(false).is_err());
/// ```
pub type Result<T> = std::result::Result<T, FenceError>;
/// Alias identical to [`Result<T>`] for readability in some contexts.
pub type FenceResult<T> = Result<T>;
/// Result specialized for configuration-related operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
/// Result specialized for input validation operations.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
/// Result specialized for security/path-vetting rejections.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Root error type for all fencefs operations.
///
/// # Exit Code Mapping
///
/// - `Security` variants map to `SecurityError` (4) — the rejection itself
///   already carries the audit-line detail; the exit code just tells the
///   transport layer which bucket to report.
/// - `Operation::BatchFailed` maps to `BlockingError` (2): the batch did not
///   run to completion, but the filesystem was rolled back, so it is
///   distinct from an unexpected internal failure.
/// - `Context` variants preserve the wrapped `FenceError`'s exit code when
///   possible; a non-`FenceError` source defaults to `GeneralError` (1).
#[derive(Error, Debug)]
pub enum FenceError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("security rejection: {0}")]
    Security(#[from] SecurityError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("filesystem error: {0}")]
    Fs(#[from] FsError),

    #[error("operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("JSON processing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("operation timeout: {operation} took longer than {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Wraps arbitrary errors from external libraries.
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Standard exit codes for the `fencefs` CLI transport.
///
/// # Examples
/// ```
/// use fencefs_core::error::{FenceError, ExitCode, SecurityError};
/// let err = FenceError::Security(SecurityError::PathTraversal { raw_input: "../etc".into() });
/// let code: ExitCode = (&err).into();
/// assert_eq!(code, ExitCode::SecurityError);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    BlockingError = 2,
    ConfigError = 3,
    SecurityError = 4,
    TimeoutError = 5,
    InternalError = 99,
}

impl From<&FenceError> for ExitCode {
    fn from(error: &FenceError) -> Self {
        match error {
            FenceError::Security(_) => ExitCode::SecurityError,
            FenceError::Config(_) => ExitCode::ConfigError,
            FenceError::Timeout { .. } => ExitCode::TimeoutError,
            FenceError::Operation(OperationError::BatchFailed { .. }) => ExitCode::BlockingError,
            FenceError::Anyhow(_) => ExitCode::InternalError,
            FenceError::Context { source, .. } => {
                if let Some(fence_err) = source.downcast_ref::<FenceError>() {
                    ExitCode::from(fence_err)
                } else {
                    ExitCode::GeneralError
                }
            }
            _ => ExitCode::GeneralError,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("workspace root does not exist or is not a directory: {path}")]
    InvalidWorkspaceRoot { path: String },

    #[error("{0}")]
    Other(String),
}

/// Security rejections raised by `PathResolver` / `PolicyEngine` (SEC-001..012).
///
/// These are never retried and never recovered locally: they propagate to
/// the caller and produce a `SECURITY_VIOLATION` audit line.
#[derive(Debug, Error, Clone)]
pub enum SecurityError {
    /// SEC-001: literal `..`, `./`, or `.\` in the raw input.
    #[error("path traversal attempt blocked: {raw_input}")]
    PathTraversal { raw_input: String },

    /// SEC-002: resolved path escapes the workspace root.
    #[error("path escapes workspace: {raw_input} resolved to {resolved}")]
    WorkspaceEscape { raw_input: String, resolved: String },

    /// SEC-003: resolved path begins with a hardcoded system path.
    #[error("access to system path blocked: {resolved}")]
    SystemPath { raw_input: String, resolved: String },

    /// SEC-004: resolved path matches a hardcoded sensitive pattern.
    #[error("access to sensitive file blocked: {resolved}")]
    SensitiveFile { raw_input: String, resolved: String },

    /// SEC-005: `allowed_subdirs` is non-empty and the path is outside all of them.
    #[error("path outside allowed subdirectories: {resolved}")]
    SubdirRestriction { raw_input: String, resolved: String },

    /// SEC-006: path begins with a user-configured blocked path.
    #[error("blocked path: {resolved}")]
    BlockedPath { raw_input: String, resolved: String },

    /// SEC-007: path matches a user-configured blocked glob pattern.
    #[error("blocked pattern match: {resolved}")]
    BlockedPattern { raw_input: String, resolved: String },

    /// SEC-008: policy is read-only and the operation mutates.
    #[error("read-only policy rejected mutating operation on {resolved}")]
    ReadOnly { raw_input: String, resolved: String },

    /// SEC-009: symlink target resolution rejected, or recursion depth exceeded.
    #[error("symlink target escapes policy: {resolved} -> {target}")]
    SymlinkEscape {
        raw_input: String,
        resolved: String,
        target: String,
    },

    /// SEC-010: agent exceeded its sliding-window operation quota.
    #[error("rate limit exceeded for agent {agent_id}")]
    RateLimit { agent_id: String },

    /// SEC-011: the administrative emergency-stop flag is set.
    #[error("emergency stop is active; all operations are rejected")]
    EmergencyStop,

    /// SEC-012: the administrative emergency-read-only flag is set.
    #[error("emergency read-only is active; mutating operations are rejected")]
    EmergencyReadOnly,
}

impl SecurityError {
    /// The raw, caller-supplied input that triggered this rejection, when
    /// the variant carries one (all but the emergency-mode variants do).
    pub fn raw_input(&self) -> Option<&str> {
        match self {
            SecurityError::PathTraversal { raw_input }
            | SecurityError::WorkspaceEscape { raw_input, .. }
            | SecurityError::SystemPath { raw_input, .. }
            | SecurityError::SensitiveFile { raw_input, .. }
            | SecurityError::SubdirRestriction { raw_input, .. }
            | SecurityError::BlockedPath { raw_input, .. }
            | SecurityError::BlockedPattern { raw_input, .. }
            | SecurityError::ReadOnly { raw_input, .. }
            | SecurityError::SymlinkEscape { raw_input, .. } => Some(raw_input),
            SecurityError::RateLimit { .. }
            | SecurityError::EmergencyStop
            | SecurityError::EmergencyReadOnly => None,
        }
    }

    /// The resolved path associated with this rejection, when known.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            SecurityError::WorkspaceEscape { resolved, .. }
            | SecurityError::SystemPath { resolved, .. }
            | SecurityError::SensitiveFile { resolved, .. }
            | SecurityError::SubdirRestriction { resolved, .. }
            | SecurityError::BlockedPath { resolved, .. }
            | SecurityError::BlockedPattern { resolved, .. }
            | SecurityError::ReadOnly { resolved, .. }
            | SecurityError::SymlinkEscape { resolved, .. } => Some(resolved),
            SecurityError::PathTraversal { .. }
            | SecurityError::RateLimit { .. }
            | SecurityError::EmergencyStop
            | SecurityError::EmergencyReadOnly => None,
        }
    }

    /// The `type` value used in the `SECURITY_VIOLATION` audit line (§6).
    pub fn audit_type(&self) -> &'static str {
        match self {
            SecurityError::PathTraversal { .. } => "path_traversal",
            SecurityError::WorkspaceEscape { .. } => "workspace_escape",
            SecurityError::SystemPath { .. } => "system_path_access",
            SecurityError::SensitiveFile { .. } => "sensitive_file_access",
            SecurityError::SubdirRestriction { .. } => "subdirectory_restriction",
            SecurityError::BlockedPath { .. } => "blocked_path",
            SecurityError::BlockedPattern { .. } => "blocked_pattern",
            SecurityError::ReadOnly { .. } => "read_only",
            SecurityError::SymlinkEscape { .. } => "symlink_escape",
            SecurityError::RateLimit { .. } => "rate_limit",
            SecurityError::EmergencyStop => "emergency_stop",
            SecurityError::EmergencyReadOnly => "emergency_read_only",
        }
    }
}

/// Input validation errors (VAL-001..005), raised before any I/O when
/// request arguments are malformed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required field missing: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("unsupported checksum algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("malformed batch operation at index {index}: {reason}")]
    MalformedBatchOp { index: usize, reason: String },

    #[error("invalid glob pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Filesystem errors raised by the OS (FS-001..011).
///
/// In batch atomic mode these trigger rollback; in non-atomic mode they are
/// captured per-op.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("already exists: {path}")]
    AlreadyExists { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    #[error("not a file: {path}")]
    NotAFile { path: String },

    #[error("directory not empty: {path}")]
    NotEmpty { path: String },

    #[error("no space left on device")]
    NoSpace,

    #[error("too many open files")]
    TooManyOpenFiles,

    #[error("atomic replace failed for {path}: {reason}")]
    AtomicReplaceFailed { path: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl FsError {
    /// Classify a raw `io::Error` into the domain taxonomy, attaching the
    /// path that was being operated on.
    pub fn from_io(err: &std::io::Error, path: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        let path = path.into();
        match err.kind() {
            ErrorKind::NotFound => FsError::NotFound { path },
            ErrorKind::PermissionDenied => FsError::PermissionDenied { path },
            ErrorKind::AlreadyExists => FsError::AlreadyExists { path },
            _ => FsError::Other(format!("{path}: {err}")),
        }
    }
}

/// Operation-level errors (OP-001..008): session lifecycle, checksum
/// mismatches, and batch-level outcomes that are not raw filesystem errors.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("watch session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("watch session already exists: {session_id}")]
    SessionExists { session_id: String },

    #[error("file modified during checksum read: {path}")]
    FileModified { path: String },

    #[error("batch failed at op {index}: {reason}")]
    BatchFailed { index: usize, reason: String },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("rollback step failed: {reason}")]
    RollbackFailed { reason: String },

    /// A single file/op payload exceeds `max_file_size`.
    #[error("file size {size} exceeds limit {max}")]
    FileTooLarge { size: u64, max: u64 },

    /// Cumulative batch bytes or op count exceeds `max_batch_size`/its cap.
    #[error("batch size {size} exceeds limit {max}")]
    BatchTooLarge { size: u64, max: u64 },

    #[error("{0}")]
    Other(String),
}

/// Error context extension trait to attach additional context during propagation.
///
/// # Examples
///
/// ```
/// use fencefs_core::error::{ErrorContext, Result, FenceError};
///
/// fn parse() -> Result<()> {
///     Err(FenceError::InvalidInput { message: "bad".into() })
///         .with_context(|| "while parsing batch request".to_string())
/// }
///
/// let err = parse().unwrap_err();
/// let s = format!("{err}");
/// assert!(s.contains("while parsing batch request"));
/// ```
pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> FenceResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> FenceResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| FenceError::Context {
            message: f(),
            source: Box::new(e),
        })
    }
}

/// Additional trait for converting any error into `FenceError` with context.
pub trait IntoFenceError<T> {
    fn into_fence_error(self) -> FenceResult<T>;
}

impl<T, E> IntoFenceError<T> for std::result::Result<T, E>
where
    E: Into<FenceError>,
{
    fn into_fence_error(self) -> FenceResult<T> {
        self.map_err(Into::into)
    }
}
