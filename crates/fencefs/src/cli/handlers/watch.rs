//! `watch_directory`, `get_watch_events`, `stop_watch`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fencefs_core::error::{FenceError, Result};
use fencefs_core::policy::PolicyEngine;
use fencefs_core::watch::WatchRegistry;
use fencefs_core::{ExitCode, OperationKind, WatchSessionId};

use crate::cli::handler::{CommandHandler, CommandResult, ExecutionMetrics};
use crate::cli::handlers::agent_of;
use crate::io::{FenceRequest, FenceResponse};

fn parse_session_id(raw: &str) -> Result<WatchSessionId> {
    WatchSessionId::from_str(raw).map_err(|message| FenceError::InvalidInput { message })
}

pub struct WatchDirectoryHandler {
    policy: Arc<PolicyEngine>,
    watch: Arc<WatchRegistry>,
}

impl WatchDirectoryHandler {
    pub fn new(policy: Arc<PolicyEngine>, watch: Arc<WatchRegistry>) -> Self {
        Self { policy, watch }
    }
}

#[async_trait]
impl CommandHandler for WatchDirectoryHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let path = request.require_path()?;
        let recursive = request.recursive.unwrap_or(true);
        let filters = request.filters.clone().unwrap_or_default();
        let agent = agent_of(&request);

        let vetted_root = self.policy.vet(path, OperationKind::Read, &agent)?;
        let id = WatchSessionId::generate();
        self.watch.start(id.clone(), &vetted_root, recursive, filters)?;
        self.policy
            .note("watch_directory", &[path.clone()], "success", &agent);

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(serde_json::json!({ "session_id": id.as_str() })),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "watch_directory"
    }
}

pub struct GetWatchEventsHandler {
    watch: Arc<WatchRegistry>,
}

impl GetWatchEventsHandler {
    pub fn new(watch: Arc<WatchRegistry>) -> Self {
        Self { watch }
    }
}

#[async_trait]
impl CommandHandler for GetWatchEventsHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let id = parse_session_id(request.require_session_id()?)?;
        let events = self.watch.get_events(&id)?;
        if request.clear.unwrap_or(false) {
            self.watch.clear_events(&id)?;
        }

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(events),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "get_watch_events"
    }
}

pub struct StopWatchHandler {
    watch: Arc<WatchRegistry>,
}

impl StopWatchHandler {
    pub fn new(watch: Arc<WatchRegistry>) -> Self {
        Self { watch }
    }
}

#[async_trait]
impl CommandHandler for StopWatchHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let id = parse_session_id(request.require_session_id()?)?;
        self.watch.stop(&id)?;

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
        "stop_watch"
    }
}
