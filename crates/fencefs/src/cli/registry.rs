//! Handler registry for managing operation handlers

use crate::cli::{handler::CommandHandler, Commands};
use dashmap::DashMap;
use fencefs_core::config::FenceConfig;
use fencefs_core::error::{FenceError, Result};
use fencefs_core::policy::PolicyEngine;
use fencefs_core::search::SearchIndex as SearchIndexTrait;
use fencefs_core::watch::WatchRegistry;
use std::sync::Arc;

/// Thread-safe storage for operation handlers, keyed by operation name.
type HandlerMap = DashMap<String, Box<dyn CommandHandler>>;

/// Reference type returned by lookups, to keep call sites readable.
type HandlerRef<'a> = dashmap::mapref::one::Ref<'a, String, Box<dyn CommandHandler>>;

/// Registry for the twelve agent-facing operation handlers. Admin
/// subcommands bypass this registry entirely since they don't read a
/// `FenceRequest` payload.
pub struct HandlerRegistry {
    handlers: HandlerMap,
}

impl HandlerRegistry {
    /// Build a registry with every operation handler wired to shared state.
    pub async fn build(
        _config: &FenceConfig,
        policy: Arc<PolicyEngine>,
        watch: Arc<WatchRegistry>,
        search_index: Arc<dyn SearchIndexTrait>,
    ) -> Result<Self> {
        let handlers = DashMap::new();
        use crate::cli::handlers::*;

        handlers.insert(
            "batch_operations".to_string(),
            Box::new(BatchOperationsHandler::new(policy.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "watch_directory".to_string(),
            Box::new(WatchDirectoryHandler::new(policy.clone(), watch.clone()))
                as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "get_watch_events".to_string(),
            Box::new(GetWatchEventsHandler::new(watch.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "stop_watch".to_string(),
            Box::new(StopWatchHandler::new(watch)) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "search_files".to_string(),
            Box::new(SearchFilesHandler::new(policy.clone(), search_index.clone()))
                as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "build_index".to_string(),
            Box::new(BuildIndexHandler::new(policy.clone(), search_index)) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "create_symlink".to_string(),
            Box::new(CreateSymlinkHandler::new(policy.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "compute_checksum".to_string(),
            Box::new(ComputeChecksumHandler::new(policy.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "verify_checksum".to_string(),
            Box::new(VerifyChecksumHandler::new(policy.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "analyze_disk_usage".to_string(),
            Box::new(AnalyzeDiskUsageHandler::new(policy.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "copy_directory".to_string(),
            Box::new(CopyDirectoryHandler::new(policy.clone())) as Box<dyn CommandHandler>,
        );
        handlers.insert(
            "sync_directory".to_string(),
            Box::new(SyncDirectoryHandler::new(policy)) as Box<dyn CommandHandler>,
        );

        Ok(Self { handlers })
    }

    /// Look up the handler for a given command (thread-safe concurrent access).
    pub fn get_handler(&self, command: &Commands) -> Result<HandlerRef<'_>> {
        let key = command.operation_name();

        self.handlers.get(key).ok_or_else(|| FenceError::InvalidInput {
            message: format!("no handler registered for operation: {key}"),
        })
    }

    /// Register a handler directly (used by tests and admin wiring).
    pub fn register(&self, key: String, handler: Box<dyn CommandHandler>) {
        self.handlers.insert(key, handler);
    }

    /// Number of registered handlers. A fully built registry holds 12.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
