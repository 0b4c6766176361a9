//! High-performance stdin processor for `fencefs` request payloads.

use bytes::BytesMut;
use fencefs_core::error::{FenceError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::io::{AsyncReadExt, stdin};

/// Resource limits applied while reading a request off stdin.
#[derive(Debug, Clone, Copy)]
pub struct StdinLimits {
    pub max_input_size_mb: u64,
    pub stdin_read_timeout_ms: u64,
    pub max_processing_time_ms: u64,
    pub max_json_depth: u32,
}

impl Default for StdinLimits {
    fn default() -> Self {
        Self {
            max_input_size_mb: 10,
            stdin_read_timeout_ms: 5_000,
            max_processing_time_ms: 10_000,
            max_json_depth: 32,
        }
    }
}

impl From<&fencefs_core::config::RequestLimits> for StdinLimits {
    fn from(limits: &fencefs_core::config::RequestLimits) -> Self {
        Self {
            max_input_size_mb: limits.max_input_size_mb,
            stdin_read_timeout_ms: limits.stdin_read_timeout_ms,
            max_processing_time_ms: limits.max_processing_time_ms,
            max_json_depth: limits.max_json_depth,
        }
    }
}

/// Async stdin reader with timeout protection, buffer reuse, and a
/// hand-rolled JSON-depth scan to reject pathologically nested payloads
/// before they ever reach `serde_json`.
pub struct StdinProcessor {
    buffer: BytesMut,
    read_buffer: Vec<u8>,
    limits: StdinLimits,
}

impl StdinProcessor {
    pub fn new(limits: StdinLimits) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            read_buffer: vec![0u8; 8192],
            limits,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(StdinLimits::default())
    }

    pub fn max_size(&self) -> usize {
        (self.limits.max_input_size_mb * 1024 * 1024) as usize
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    #[cfg(test)]
    pub fn buffer_ptr(&self) -> *const u8 {
        self.buffer.as_ptr()
    }

    pub fn validate_size(&self, size: usize) -> Result<()> {
        let max_size = self.max_size();
        if size > max_size {
            return Err(FenceError::InvalidInput {
                message: format!("input size {size} exceeds maximum {max_size}"),
            });
        }
        Ok(())
    }

    pub async fn read_json<T>(&mut self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let stdin_timeout_ms = self.limits.stdin_read_timeout_ms;
        let processing_timeout_ms = self.limits.max_processing_time_ms;
        let max_depth = self.limits.max_json_depth;

        let start_time = std::time::Instant::now();
        let input = match tokio::time::timeout(
            Duration::from_millis(processing_timeout_ms),
            self.read_to_buffer_with_timeout(stdin_timeout_ms),
        )
        .await
        {
            Ok(Ok(buffer)) => buffer,
            Ok(Err(io_err)) => return Err(io_err),
            Err(_timeout) => {
                return Err(FenceError::Timeout {
                    operation: "total_processing".to_string(),
                    timeout_ms: processing_timeout_ms,
                });
            }
        };

        Self::validate_json_depth_static(input, max_depth)?;

        let elapsed = start_time.elapsed().as_millis() as u64;
        if elapsed >= processing_timeout_ms {
            return Err(FenceError::Timeout {
                operation: "json_parsing".to_string(),
                timeout_ms: processing_timeout_ms,
            });
        }

        serde_json::from_slice(input).map_err(FenceError::Json)
    }

    async fn read_to_buffer_with_timeout(&mut self, timeout_ms: u64) -> Result<&[u8]> {
        self.buffer.clear();
        let mut stdin = stdin();

        loop {
            let n = tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                stdin.read(&mut self.read_buffer),
            )
            .await
            .map_err(|_| FenceError::Timeout {
                operation: "stdin_read_operation".to_string(),
                timeout_ms,
            })?
            .map_err(FenceError::Io)?;

            if n == 0 {
                break;
            }

            self.validate_size(self.buffer.len() + n)?;
            self.buffer.extend_from_slice(&self.read_buffer[..n]);
        }

        Ok(&self.buffer)
    }

    /// Read a [`crate::io::FenceRequest`] from stdin.
    pub async fn read_request(&mut self) -> Result<crate::io::FenceRequest> {
        self.read_json().await
    }

    /// Reject inputs whose brace/bracket nesting exceeds `max_depth` before
    /// handing them to `serde_json`, guarding against JSON-bomb payloads.
    pub fn validate_json_depth_static(input: &[u8], max_depth: u32) -> Result<()> {
        let mut depth = 0u32;
        let mut in_string = false;
        let mut escape_next = false;

        for &byte in input {
            if escape_next {
                escape_next = false;
                continue;
            }

            match byte {
                b'"' if !escape_next => in_string = !in_string,
                b'\\' if in_string => escape_next = true,
                b'{' | b'[' if !in_string => {
                    depth += 1;
                    if depth > max_depth {
                        return Err(FenceError::InvalidInput {
                            message: format!(
                                "JSON nesting depth {depth} exceeds maximum {max_depth}"
                            ),
                        });
                    }
                }
                b'}' | b']' if !in_string => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Current process memory usage, for DoS-protection monitoring.
    /// Returns `None` on platforms without a tracking strategy here.
    pub fn get_memory_usage() -> Option<usize> {
        #[cfg(target_os = "linux")]
        {
            if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
                for line in status.lines().filter(|line| line.starts_with("VmRSS:")) {
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<usize>() {
                            return Some(kb * 1024);
                        }
                    }
                }
            }
        }

        #[cfg(target_os = "macos")]
        {
            if let Ok(output) = std::process::Command::new("ps")
                .args(["-o", "rss=", "-p"])
                .arg(std::process::id().to_string())
                .output()
            {
                if let Ok(rss_str) = String::from_utf8(output.stdout) {
                    if let Ok(rss_kb) = rss_str.trim().parse::<usize>() {
                        return Some(rss_kb * 1024);
                    }
                }
            }
        }

        #[cfg(windows)]
        {
            use winapi::um::processthreadsapi::GetCurrentProcess;
            use winapi::um::psapi::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};

            unsafe {
                let mut counters: PROCESS_MEMORY_COUNTERS = std::mem::zeroed();
                let result = GetProcessMemoryInfo(
                    GetCurrentProcess(),
                    &mut counters,
                    std::mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32,
                );
                if result != 0 {
                    return Some(counters.WorkingSetSize);
                }
            }
        }

        None
    }
}

impl Default for StdinProcessor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_deeply_nested_json() {
        let input = "[".repeat(10).into_bytes();
        let err = StdinProcessor::validate_json_depth_static(&input, 5).unwrap_err();
        assert!(matches!(err, FenceError::InvalidInput { .. }));
    }

    #[test]
    fn accepts_shallow_json() {
        let input = br#"{"agent_id": "a", "path": "/tmp"}"#;
        assert!(StdinProcessor::validate_json_depth_static(input, 5).is_ok());
    }

    #[tokio::test]
    async fn read_json_rejects_oversized_input() {
        let mut processor = StdinProcessor::new(StdinLimits {
            max_input_size_mb: 0,
            ..StdinLimits::default()
        });
        assert!(processor.validate_size(1).is_err());
    }
}
