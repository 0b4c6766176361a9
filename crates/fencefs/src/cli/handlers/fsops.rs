//! `create_symlink`, `copy_directory`, `sync_directory`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fencefs_core::auxops::create_symlink;
use fencefs_core::dirops::{copy_recursive, sync_recursive};
use fencefs_core::error::Result;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::{ExitCode, OperationKind};

use crate::cli::handler::{CommandHandler, CommandResult, ExecutionMetrics};
use crate::cli::handlers::agent_of;
use crate::io::{FenceRequest, FenceResponse};

pub struct CreateSymlinkHandler {
    policy: Arc<PolicyEngine>,
}

impl CreateSymlinkHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for CreateSymlinkHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let link = request.require_link()?;
        let target = request.require_target()?;
        let agent = agent_of(&request);

        let (vetted_link, vetted_target) = self.policy.vet_symlink(link, target, &agent)?;
        create_symlink(&vetted_link, &vetted_target)?;
        self.policy
            .note("create_symlink", &[link.clone(), target.clone()], "success", &agent);

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok_empty(),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "create_symlink"
    }
}

pub struct CopyDirectoryHandler {
    policy: Arc<PolicyEngine>,
}

impl CopyDirectoryHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for CopyDirectoryHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let source = request.require_source()?;
        let destination = request.require_destination()?;
        let preserve_metadata = request.preserve_metadata.unwrap_or(true);
        let exclusions = request.compile_exclusions()?;
        let agent = agent_of(&request);

        let vetted_source = self.policy.vet(source, OperationKind::Read, &agent)?;
        let vetted_destination = self.policy.vet(destination, OperationKind::Write, &agent)?;
        let stats = copy_recursive(
            &vetted_source,
            &vetted_destination,
            preserve_metadata,
            &exclusions,
        )?;
        self.policy
            .note("copy_directory", &[source.clone(), destination.clone()], "success", &agent);

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(stats_json(&stats)),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "copy_directory"
    }
}

pub struct SyncDirectoryHandler {
    policy: Arc<PolicyEngine>,
}

impl SyncDirectoryHandler {
    pub fn new(policy: Arc<PolicyEngine>) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl CommandHandler for SyncDirectoryHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let source = request.require_source()?;
        let destination = request.require_destination()?;
        let exclusions = request.compile_exclusions()?;
        let agent = agent_of(&request);

        let vetted_source = self.policy.vet(source, OperationKind::Read, &agent)?;
        let vetted_destination = self.policy.vet(destination, OperationKind::Write, &agent)?;
        let stats = sync_recursive(&vetted_source, &vetted_destination, &exclusions)?;
        self.policy
            .note("sync_directory", &[source.clone(), destination.clone()], "success", &agent);

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(stats_json(&stats)),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "sync_directory"
    }
}

fn stats_json(stats: &fencefs_core::dirops::CopyStats) -> serde_json::Value {
    serde_json::json!({
        "files_copied": stats.files_copied,
        "files_skipped": stats.files_skipped,
        "bytes_transferred": stats.bytes_transferred,
    })
}
