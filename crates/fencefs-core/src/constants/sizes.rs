//! Size-related constants to eliminate magic numbers
//!
//! Centralizes byte-size math used by the rate limiter's size guards and by
//! tests that exercise them.

/// Number of bytes in a kilobyte.
pub const BYTES_PER_KB: usize = 1024;

/// Number of bytes in a megabyte.
pub const BYTES_PER_MB: usize = 1024 * 1024;

/// Number of bytes in a gigabyte.
pub const BYTES_PER_GB: usize = 1024 * 1024 * 1024;

/// Default buffer size in kilobytes for streaming checksum reads.
pub const DEFAULT_BUFFER_KB: usize = 8;

/// Default buffer size in bytes for streaming checksum reads.
pub const DEFAULT_BUFFER_SIZE: usize = DEFAULT_BUFFER_KB * BYTES_PER_KB;

/// Maximum log file size in megabytes.
pub const MAX_LOG_FILE_SIZE_MB: usize = 10;

/// Maximum log file size in bytes.
pub const MAX_LOG_FILE_SIZE: usize = MAX_LOG_FILE_SIZE_MB * BYTES_PER_MB;

/// Maximum number of rolled log files to keep per session.
pub const MAX_LOG_FILES_PER_SESSION: usize = 10;

/// Test-specific size fixtures.
pub mod test_sizes {
    use super::*;

    /// Small test size (1MB).
    pub const SMALL_TEST_SIZE: usize = BYTES_PER_MB;

    /// Medium test size (5MB).
    pub const MEDIUM_TEST_SIZE: usize = 5 * BYTES_PER_MB;

    /// Large test size (10MB) — approximates the default `maxFileSize`/10.
    pub const LARGE_TEST_SIZE: usize = 10 * BYTES_PER_MB;
}
