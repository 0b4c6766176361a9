//! `search_files`, `build_index`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fencefs_core::error::Result;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::search::{SearchIndex, SearchQuery};
use fencefs_core::{ExitCode, OperationKind};

use crate::cli::handler::{CommandHandler, CommandResult, ExecutionMetrics};
use crate::cli::handlers::agent_of;
use crate::io::{FenceRequest, FenceResponse};

pub struct SearchFilesHandler {
    policy: Arc<PolicyEngine>,
    index: Arc<dyn SearchIndex>,
}

impl SearchFilesHandler {
    pub fn new(policy: Arc<PolicyEngine>, index: Arc<dyn SearchIndex>) -> Self {
        Self { policy, index }
    }
}

#[async_trait]
impl CommandHandler for SearchFilesHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let path = request.require_path()?;
        let query = SearchQuery {
            query: request.require_query()?.to_string(),
            search_type: request.search_type.unwrap_or(fencefs_core::search::SearchType::Name),
            file_types: request.file_types.clone().unwrap_or_default(),
            min_size: request.min_size,
            max_size: request.max_size,
            modified_after: request.modified_after,
        };
        let agent = agent_of(&request);

        let vetted_root = self.policy.vet(path, OperationKind::Read, &agent)?;
        let matches = self.index.search(&vetted_root, &query)?;

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(matches),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "search_files"
    }
}

pub struct BuildIndexHandler {
    policy: Arc<PolicyEngine>,
    index: Arc<dyn SearchIndex>,
}

impl BuildIndexHandler {
    pub fn new(policy: Arc<PolicyEngine>, index: Arc<dyn SearchIndex>) -> Self {
        Self { policy, index }
    }
}

#[async_trait]
impl CommandHandler for BuildIndexHandler {
    async fn execute(&self, request: FenceRequest) -> Result<CommandResult> {
        let start = Instant::now();
        let path = request.require_path()?;
        let include_content = request.include_content.unwrap_or(false);
        let agent = agent_of(&request);

        let vetted_root = self.policy.vet(path, OperationKind::Read, &agent)?;
        let stats = self.index.build_index(&vetted_root, include_content)?;

        Ok(CommandResult {
            exit_code: ExitCode::Success,
            response: FenceResponse::ok(stats),
            metrics: ExecutionMetrics {
                total_time: start.elapsed(),
                ..Default::default()
            },
        })
    }

    fn name(&self) -> &'static str {
        "build_index"
    }
}
