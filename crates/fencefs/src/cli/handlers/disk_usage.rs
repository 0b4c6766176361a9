//! `analyze_disk_usage`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fencefs_core::auxops::analyze_disk_usage;
use fencefs_core::error::Result;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::{ExitCode, OperationKind};

use crate::cli::handler::{CommandHandler, CommandResult, ExecutionMetrics};
use crate::cli::handlers::agent_of;
use crate::io::{FenceRequest, FenceResponse};

const DEFAULT_MAX_DEPTH: usize = usize::MAX;

pub struct AnalyzeDiskUsageHandler {
    policy: Arc<PolicyEngine>,
}

impl AnalyzeDiskUsageHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for AnalyzeDiskUsageHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let path = request.require_path()?;
        let max_depth = request.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        let group_by_type = request.group_by_type.unwrap_or(false);
        let agent = agent_of(&request);

        let vetted = self.policy.vet(path, OperationKind::Read, &agent)?;
        let report = analyze_disk_usage(&vetted, max_depth, group_by_type)?;

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(report),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "analyze_disk_usage"
    }
}
