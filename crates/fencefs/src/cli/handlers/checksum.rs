//! `compute_checksum`, `verify_checksum`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fencefs_core::auxops::{compute_checksum, verify_checksum, ChecksumAlgorithm};
use fencefs_core::error::Result;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::{ExitCode, OperationKind};

use crate::cli::handler::{CommandHandler, CommandResult, ExecutionMetrics};
use crate::cli::handlers::agent_of;
use crate::io::{FenceRequest, FenceResponse};

fn algorithm_of(request: &FenceRequest) -> Result<ChecksumAlgorithm> {
    let raw = request.algorithm.as_deref().unwrap_or("sha256");
    ChecksumAlgorithm::from_str(raw).map_err(Into::into)
}

pub struct ComputeChecksumHandler {
    policy: Arc<PolicyEngine>,
}

impl ComputeChecksumHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for ComputeChecksumHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let path = request.require_path()?;
        let algorithm = algorithm_of(&request)?;
        let agent = agent_of(&request);

        let vetted = self.policy.vet(path, OperationKind::Read, &agent)?;
        let digest = compute_checksum(&vetted, algorithm)?;

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(serde_json::json!({
                "algorithm": algorithm.to_string(),
                "digest": digest,
            })),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "compute_checksum"
    }
}

pub struct VerifyChecksumHandler {
    policy: Arc<PolicyEngine>,
}

impl VerifyChecksumHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for VerifyChecksumHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let path = request.require_path()?;
        let expected = request.require_expected()?;
        let algorithm = algorithm_of(&request)?;
        let agent = agent_of(&request);

        let vetted = self.policy.vet(path, OperationKind::Read, &agent)?;
        let verification = verify_checksum(&vetted, expected, algorithm)?;

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(verification),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "verify_checksum"
    }
}
