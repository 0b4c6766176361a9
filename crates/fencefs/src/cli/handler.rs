//! Command handler trait and result types

use crate::io::{FenceRequest, FenceResponse};
use async_trait::async_trait;
use fencefs_core::error::Result;
use fencefs_core::ExitCode;
use std::time::Duration;

/// Result returned by command handlers
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
    /// Response body to serialize to stdout
    pub response: FenceResponse,
    /// Execution metrics for performance tracking
    pub metrics: ExecutionMetrics,
}

/// Metrics collected during command execution
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    /// Time spent validating input
    pub validation_time: Duration,
    /// Time spent in handler logic
    pub handler_time: Duration,
    /// Total execution time
    pub total_time: Duration,
}

/// Trait for operation handlers with async execution
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Execute the operation against a decoded request
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult>;

    /// Operation name for logging/metrics
    fn name(&self) -> &'static str;

    /// Validate the request before execution (optional)
    fn validate_input(&self, _request: &FenceRequest) -> Result<()> {
        Ok(())
    }
}
