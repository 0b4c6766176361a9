//! CLI context for dependency injection and shared resources

use crate::cli::{dispatcher::CommandDispatcher, AdminAction, Commands};
use fencefs_core::batch::BatchExecutor;
use fencefs_core::config::FenceConfig;
use fencefs_core::error::{ConfigError, FenceError, Result};
use fencefs_core::metrics::PerformanceMetrics;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::search::{SearchIndex, WalkdirSearchIndex};
use fencefs_core::watch::WatchRegistry;
use fencefs_core::{AgentId, ExitCode};
use std::sync::{Arc, OnceLock};

const CONFIG_PATH_ENV: &str = "FENCEFS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "fencefs.json";

/// Dependency container for CLI operations with lazy initialization.
pub struct CliContext {
    config: OnceLock<Arc<FenceConfig>>,
    metrics: OnceLock<Arc<PerformanceMetrics>>,
    policy: OnceLock<Arc<PolicyEngine>>,
    watch: OnceLock<Arc<WatchRegistry>>,
    search_index: OnceLock<Arc<dyn SearchIndex>>,
    dispatcher: OnceLock<CommandDispatcher>,
}

impl CliContext {
    /// Build CLI context with lazy initialization.
    pub async fn build() -> Result<Self> {
        Ok(Self {
            config: OnceLock::new(),
            metrics: OnceLock::new(),
            policy: OnceLock::new(),
            watch: OnceLock::new(),
            search_index: OnceLock::new(),
            dispatcher: OnceLock::new(),
        })
    }

    /// Build CLI context with a caller-supplied configuration (useful for testing).
    pub async fn build_with_config(config: FenceConfig) -> Result<Self> {
        let context = Self {
            config: OnceLock::new(),
            metrics: OnceLock::new(),
            policy: OnceLock::new(),
            watch: OnceLock::new(),
            search_index: OnceLock::new(),
            dispatcher: OnceLock::new(),
        };
        let _ = context.config.set(Arc::new(config));
        Ok(context)
    }

    /// Build CLI context with a pre-built dispatcher (unit testing only).
    #[cfg(test)]
    pub(crate) async fn build_with_test_dispatcher(
        config: FenceConfig,
        dispatcher: CommandDispatcher,
    ) -> Result<Self> {
        let context = Self {
            config: OnceLock::new(),
            metrics: OnceLock::new(),
            policy: OnceLock::new(),
            watch: OnceLock::new(),
            search_index: OnceLock::new(),
            dispatcher: OnceLock::new(),
        };
        let _ = context.config.set(Arc::new(config));
        let _ = context.dispatcher.set(dispatcher);
        Ok(context)
    }

    /// Execute a command and return the exit code, with lazy initialization.
    pub async fn execute(self, command: Commands) -> ExitCode {
        if let Commands::Admin { action } = &command {
            return self.execute_admin(action).await;
        }

        match self.get_dispatcher().await {
            Ok(dispatcher) => match dispatcher.dispatch(command).await {
                Ok(result) => {
                    if let Some(data) = &result.response.data {
                        if let Ok(text) = serde_json::to_string(data) {
                            println!("{text}");
                        }
                    }
                    if let Some(error) = &result.response.error {
                        eprintln!("{error}");
                    }
                    result.exit_code
                }
                Err(err) => {
                    tracing::error!("command execution failed: {err:?}");
                    ExitCode::from(&err)
                }
            },
            Err(err) => {
                tracing::error!("fencefs initialization failed: {err:?}");
                ExitCode::from(&err)
            }
        }
    }

    async fn execute_admin(&self, action: &AdminAction) -> ExitCode {
        let policy = self.get_policy();
        match action {
            AdminAction::EmergencyStop { read_only, clear } => {
                if *clear {
                    policy.set_emergency_stop(false);
                    policy.set_emergency_read_only(false);
                } else if *read_only {
                    policy.set_emergency_read_only(true);
                } else {
                    policy.set_emergency_stop(true);
                }
                println!("{{\"success\":true}}");
                ExitCode::Success
            }
            AdminAction::SweepBackups => {
                let config = match self.get_config() {
                    Ok(config) => config,
                    Err(err) => return ExitCode::from(&err),
                };
                let agent = AgentId::from_raw("admin");
                let root = match policy.vet(
                    &config.policy.workspace_root,
                    fencefs_core::OperationKind::Delete,
                    &agent,
                ) {
                    Ok(root) => root,
                    Err(err) => return ExitCode::from(&err),
                };
                let executor = BatchExecutor::new(&policy);
                match executor.sweep_shadow_backups(&root, 86_400, &agent) {
                    Ok(removed) => {
                        println!("{{\"success\":true,\"data\":{{\"removed\":{removed}}}}}");
                        ExitCode::Success
                    }
                    Err(err) => ExitCode::from(&err),
                }
            }
        }
    }

    fn get_config(&self) -> Result<Arc<FenceConfig>> {
        if let Some(config) = self.config.get() {
            return Ok(config.clone());
        }

        let new_config = Arc::new(load_config()?);
        match self.config.set(new_config.clone()) {
            Ok(()) => Ok(new_config),
            Err(_) => Ok(self
                .config
                .get()
                .expect("config must be set after race")
                .clone()),
        }
    }

    fn get_metrics(&self) -> Arc<PerformanceMetrics> {
        self.metrics
            .get_or_init(|| Arc::new(PerformanceMetrics::new()))
            .clone()
    }

    fn get_policy(&self) -> Arc<PolicyEngine> {
        if let Some(policy) = self.policy.get() {
            return policy.clone();
        }
        let config = self.get_config().unwrap_or_else(|_| {
            Arc::new(FenceConfig::from_json_str(r#"{"policy": {"workspaceRoot": "."}}"#).unwrap())
        });
        let new_policy = Arc::new(PolicyEngine::new(config.policy.clone()));
        match self.policy.set(new_policy.clone()) {
            Ok(()) => new_policy,
            Err(_) => self.policy.get().expect("policy must be set after race").clone(),
        }
    }

    fn get_watch_registry(&self) -> Arc<WatchRegistry> {
        self.watch
            .get_or_init(|| Arc::new(WatchRegistry::new()))
            .clone()
    }

    fn get_search_index(&self) -> Arc<dyn SearchIndex> {
        self.search_index
            .get_or_init(|| Arc::new(WalkdirSearchIndex::new()) as Arc<dyn SearchIndex>)
            .clone()
    }

    async fn get_dispatcher(&self) -> Result<&CommandDispatcher> {
        if let Some(dispatcher) = self.dispatcher.get() {
            return Ok(dispatcher);
        }

        let config = self.get_config()?;
        let metrics = self.get_metrics();
        let policy = self.get_policy();
        let watch = self.get_watch_registry();
        let search_index = self.get_search_index();

        let registry =
            crate::cli::registry::HandlerRegistry::build(&config, policy, watch, search_index)
                .await?;
        let new_dispatcher = CommandDispatcher::new(config, metrics, registry).await?;

        match self.dispatcher.set(new_dispatcher) {
            Ok(()) => self.dispatcher.get().ok_or_else(dispatcher_init_failed),
            Err(_) => self.dispatcher.get().ok_or_else(dispatcher_init_failed),
        }
    }

    /// Configuration accessor, for tests.
    pub fn config(&self) -> Result<Arc<FenceConfig>> {
        self.get_config()
    }

    /// Metrics accessor, for tests.
    pub fn metrics(&self) -> Arc<PerformanceMetrics> {
        self.get_metrics()
    }
}

fn dispatcher_init_failed() -> FenceError {
    ConfigError::InvalidFormat {
        reason: "failed to initialize dispatcher".to_string(),
    }
    .into()
}

fn load_config() -> Result<FenceConfig> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from(DEFAULT_CONFIG_FILE));

    if path.exists() {
        return FenceConfig::load(&path);
    }

    let workspace_root = std::env::current_dir().map_err(FenceError::Io)?;
    let json = serde_json::to_string(&serde_json::json!({
        "policy": { "workspaceRoot": workspace_root }
    }))?;
    FenceConfig::from_json_str(&json)
}
