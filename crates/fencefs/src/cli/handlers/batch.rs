//! `batch_operations`: atomic or best-effort copy/move/delete execution.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fencefs_core::batch::BatchExecutor;
use fencefs_core::error::Result;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::ExitCode;

use crate::cli::handler::{CommandHandler, CommandResult, ExecutionMetrics};
use crate::cli::handlers::agent_of;
use crate::io::{FenceRequest, FenceResponse};

pub struct BatchOperationsHandler {
    policy: Arc<PolicyEngine>,
}

impl BatchOperationsHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for BatchOperationsHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let ops = request.require_ops()?;
        let atomic = request.atomic.unwrap_or(false);
        let agent = agent_of(&request);

        let handler_start = Instant::now();
        let executor = BatchExecutor::new(&self.policy);
        let results = executor.execute_batch(ops, atomic, &agent)?;
        let handler_time = handler_start.elapsed();

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(results),
            metrics: ExecutionMetrics {
                validation_time: std::time::Duration::ZERO,
                handler_time,
                total_time: start.elapsed(),
            },
        })
    }

    fn name(&self) -> &'static str {
        "batch_operations"
    }
}
