//! Command dispatcher for routing commands to handlers

use crate::cli::{handler::CommandResult, registry::HandlerRegistry, Commands};
use crate::io::{FenceRequest, StdinProcessor};
use async_trait::async_trait;
use fencefs_core::config::FenceConfig;
use fencefs_core::error::{FenceError, Result};
use fencefs_core::metrics::PerformanceMetrics;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Type alias for async-safe input provider to reduce type complexity.
type ThreadSafeInputProvider = Arc<Mutex<Box<dyn InputProvider>>>;

/// Abstracts request reading so the dispatcher can be driven by real stdin
/// in production and by fixtures in tests.
#[async_trait]
pub trait InputProvider: Send + Sync {
    async fn read_request(&mut self) -> Result<FenceRequest>;
}

#[async_trait]
impl InputProvider for StdinProcessor {
    async fn read_request(&mut self) -> Result<FenceRequest> {
        self.read_request().await
    }
}

/// Routes an operation to its handler with resource-limit enforcement.
pub struct CommandDispatcher {
    pub config: Arc<FenceConfig>,
    metrics: Arc<PerformanceMetrics>,
    pub registry: HandlerRegistry,
    input_provider: ThreadSafeInputProvider,
}

impl CommandDispatcher {
    /// Build a dispatcher reading real requests from stdin.
    pub async fn new(
        config: Arc<FenceConfig>,
        metrics: Arc<PerformanceMetrics>,
        registry: HandlerRegistry,
    ) -> Result<Self> {
        let stdin_processor = StdinProcessor::new((&config.limits).into());

        Ok(Self {
            config,
            metrics,
            registry,
            input_provider: Arc::new(Mutex::new(Box::new(stdin_processor))),
        })
    }

    /// Build a dispatcher with a caller-supplied input provider (tests, fixtures).
    pub async fn new_with_input_provider(
        config: Arc<FenceConfig>,
        metrics: Arc<PerformanceMetrics>,
        registry: HandlerRegistry,
        input_provider: Box<dyn InputProvider>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            metrics,
            registry,
            input_provider: Arc::new(Mutex::new(input_provider)),
        })
    }

    /// Dispatch `command`, reading its request from stdin when it expects one.
    pub async fn dispatch(&self, command: Commands) -> Result<CommandResult> {
        let start_time = Instant::now();

        let request = if command.expects_stdin() {
            self.read_input().await?
        } else {
            FenceRequest::default()
        };

        let handler = self.registry.get_handler(&command)?;

        let validation_start = Instant::now();
        handler.validate_input(&request)?;
        let validation_time = validation_start.elapsed();

        let handler_start = Instant::now();
        let execution_timeout = Duration::from_millis(self.config.limits.max_execution_time_ms);

        let mut result = match tokio::time::timeout(execution_timeout, handler.execute(request)).await
        {
            Ok(result) => result?,
            Err(_timeout) => {
                return Err(FenceError::Timeout {
                    operation: handler.name().to_string(),
                    timeout_ms: self.config.limits.max_execution_time_ms,
                });
            }
        };
        let handler_time = handler_start.elapsed();

        if let Some(memory_usage) = StdinProcessor::get_memory_usage() {
            let memory_limit_bytes = (self.config.limits.max_input_size_mb * 1024 * 1024) as usize;
            if memory_usage > memory_limit_bytes {
                tracing::warn!(
                    memory_usage,
                    memory_limit_bytes,
                    "high memory usage detected after handler execution"
                );
            }
        }

        result.metrics.validation_time = validation_time;
        result.metrics.handler_time = handler_time;
        result.metrics.total_time = start_time.elapsed();

        self.record_metrics(handler.name(), result.metrics.total_time);

        Ok(result)
    }

    async fn read_input(&self) -> Result<FenceRequest> {
        let mut guard = self.input_provider.lock().await;
        guard.read_request().await
    }

    fn record_metrics(&self, operation_name: &str, duration: Duration) {
        self.metrics.record_execution_time(operation_name, duration);
    }
}
