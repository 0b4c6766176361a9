//! Logging infrastructure for fencefs
//!
//! This module provides a thin wrapper around the `tracing` ecosystem (the de facto
//! standard for Rust logging) with fencefs-specific enhancements for per-agent
//! log rotation and compression.
//!
//! # Architecture
//!
//! The logging system is built on top of:
//! - **`tracing`** - For structured logging and instrumentation, including the
//!   audit lines `PolicyEngine` emits under the `"audit"` target
//! - **`tracing-subscriber`** - For log formatting and filtering
//! - **Custom `SessionLogger`** - For per-agent file management and rotation
//!
//! # Why Not Just Use tracing Directly?
//!
//! While `tracing` provides excellent logging primitives, fencefs needs:
//! - **Per-agent isolation** - Each calling agent can get its own log files
//! - **Automatic rotation** - Prevent unbounded log growth
//! - **Compression** - Reduce storage for archived logs
//! - **Thread-safe file writes** - Multiple agents logging concurrently
//!
//! # Features
//!
//! - **Structured logging** with JSON, plain text, or pretty formats
//! - **Per-agent log files** with automatic directory creation
//! - **Size-based rotation** with configurable limits
//! - **Optional gzip compression** for rotated logs
//! - **Thread-safe operations** using `parking_lot::RwLock`
//! - **Zero-cost when disabled** via compile-time filtering
//!
//! # Examples
//!
//! ## Basic Setup
//!
//! ```rust,no_run
//! use fencefs_core::logging::{LoggingConfig, LogLevel, LogFormat, LogOutput, init_logging};
//! use fencefs_core::AgentId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoggingConfig {
//!     level: LogLevel::Info,
//!     format: LogFormat::Json,
//!     output: LogOutput::Both,
//!     enable_performance_logs: true,
//!     enable_security_logs: true,
//!     rolling: Default::default(),
//! };
//!
//! init_logging(&config)?;
//!
//! // Now use standard tracing macros
//! let agent_id = AgentId::generate();
//! tracing::info!("fencefs initialized");
//! tracing::debug!(agent_id = ?agent_id, "agent attached");
//! # Ok(())
//! # }
//! ```
//!
//! ## Per-Agent Logging
//!
//! ```rust,no_run
//! use fencefs_core::logging::{SessionLogger, RollingLogConfig};
//! use fencefs_core::AgentId;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let agent_id = AgentId::generate();
//! let log_dir = PathBuf::from("/var/log/fencefs/agents");
//! let config = RollingLogConfig::default();
//!
//! let mut logger = SessionLogger::new(agent_id, log_dir, config)?;
//!
//! // Write structured log entries
//! logger.write(r#"{"level":"info","msg":"batch started"}"#)?;
//! logger.write(r#"{"level":"debug","msg":"vetting path"}"#)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread-Safe Concurrent Logging
//!
//! ```rust,no_run
//! use fencefs_core::logging::{SessionLogger, RollingLogConfig};
//! use fencefs_core::AgentId;
//! use std::sync::Arc;
//! use std::thread;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let agent_id = AgentId::generate();
//! let log_dir = PathBuf::from("/tmp/logs");
//! let config = RollingLogConfig::default();
//! let logger = Arc::new(SessionLogger::new(agent_id, log_dir, config)?.into_thread_safe());
//!
//! let handles: Vec<_> = (0..10)
//!     .map(|i| {
//!         let logger = Arc::clone(&logger);
//!         thread::spawn(move || {
//!             logger.write(&format!("Thread {} log entry", i)).unwrap();
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Performance
//!
//! - **Minimal overhead** - Tracing macros compile to no-ops when disabled
//! - **Buffered writes** - Reduces syscall overhead
//! - **Lock-free reads** - Using `parking_lot::RwLock`
//! - **Lazy formatting** - Messages only formatted if level is enabled
//!
//! # Integration with Tracing Ecosystem
//!
//! Since we use standard `tracing`, you get compatibility with:
//! - OpenTelemetry exporters
//! - Jaeger/Zipkin tracing
//! - Application performance monitoring (APM) tools
//! - Custom subscribers and layers

mod config;
mod init;
mod session;

pub use config::{LogFormat, LogLevel, LogOutput, LoggingConfig, RollingLogConfig};
pub use init::init_logging;
pub use session::SessionLogger;
