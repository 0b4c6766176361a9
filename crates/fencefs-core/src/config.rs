//! Configuration for fencefs: the on-disk `PolicyConfig`/`FenceConfig`
//! schema (§3, §6), JSON loading, environment-variable overrides, and
//! validation.
//!
//! # Example
//! ```
//! use fencefs_core::config::FenceConfig;
//!
//! let json = r#"{"policy": {"workspaceRoot": "/tmp"}}"#;
//! let cfg = FenceConfig::from_json_str(json).unwrap();
//! assert_eq!(cfg.logging.level, "info");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_AUDIT_ENABLED, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MAX_OPS_PER_MINUTE, DEFAULT_READ_ONLY,
};
use crate::error::{ConfigError, Result};

/// On-the-wire shape of the policy section of a fencefs config file.
///
/// Mirrors `PolicyConfig` field-for-field, except `blocked_patterns` is a
/// list of glob strings here and a list of compiled matchers at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPolicyConfig {
    pub workspace_root: PathBuf,
    #[serde(rename = "allowedSubdirectories")]
    pub allowed_subdirs: Vec<PathBuf>,
    pub blocked_paths: Vec<PathBuf>,
    pub blocked_patterns: Vec<String>,
    pub max_file_size: Option<u64>,
    pub max_batch_size: Option<u64>,
    #[serde(rename = "maxOperationsPerMinute")]
    pub max_ops_per_minute: Option<u32>,
    pub max_ops_per_hour: Option<u32>,
    pub read_only: Option<bool>,
    #[serde(rename = "enableAuditLog")]
    pub audit_enabled: Option<bool>,
}

/// The runtime policy configuration every `PathResolver`/`RateLimiter`
/// call is vetted against. Immutable once constructed (§3).
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub workspace_root: PathBuf,
    pub allowed_subdirs: Vec<PathBuf>,
    pub blocked_paths: Vec<PathBuf>,
    pub blocked_patterns: Vec<globset::GlobMatcher>,
    pub max_file_size: u64,
    pub max_batch_size: u64,
    pub max_ops_per_minute: u32,
    pub max_ops_per_hour: Option<u32>,
    pub read_only: bool,
    pub audit_enabled: bool,
}

impl PolicyConfig {
    /// A policy scoped to `workspace_root` with every other field at its
    /// spec default. Handy for tests and for `fencefs init`-style defaults.
    pub fn for_workspace(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root,
            allowed_subdirs: Vec::new(),
            blocked_paths: Vec::new(),
            blocked_patterns: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_ops_per_minute: DEFAULT_MAX_OPS_PER_MINUTE,
            max_ops_per_hour: None,
            read_only: DEFAULT_READ_ONLY,
            audit_enabled: DEFAULT_AUDIT_ENABLED,
        }
    }

    /// Compile a [`RawPolicyConfig`] into its runtime form, validating the
    /// workspace root and every glob pattern along the way.
    pub fn from_raw(raw: RawPolicyConfig) -> Result<Self> {
        if raw.workspace_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "policy.workspace_root".into(),
            }
            .into());
        }
        if !raw.workspace_root.is_dir() {
            return Err(ConfigError::InvalidWorkspaceRoot {
                path: raw.workspace_root.display().to_string(),
            }
            .into());
        }
        let workspace_root = dunce::canonicalize(&raw.workspace_root)
            .unwrap_or_else(|_| crate::path::normalize_path(&raw.workspace_root));

        let mut blocked_patterns = Vec::with_capacity(raw.blocked_patterns.len());
        for pattern in &raw.blocked_patterns {
            let glob = globset::Glob::new(pattern).map_err(|e| ConfigError::InvalidValue {
                field: "policy.blocked_patterns".into(),
                value: pattern.clone(),
                reason: e.to_string(),
            })?;
            blocked_patterns.push(glob.compile_matcher());
        }

        for dir in &raw.allowed_subdirs {
            if !dir.starts_with(&workspace_root) && dir != &workspace_root {
                return Err(ConfigError::InvalidValue {
                    field: "policy.allowed_subdirs".into(),
                    value: dir.display().to_string(),
                    reason: "must be under workspace_root".into(),
                }
                .into());
            }
        }

        Ok(Self {
            workspace_root,
            allowed_subdirs: raw.allowed_subdirs,
            blocked_paths: raw.blocked_paths,
            blocked_patterns,
            max_file_size: raw.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            max_batch_size: raw.max_batch_size.unwrap_or(DEFAULT_MAX_BATCH_SIZE),
            max_ops_per_minute: raw.max_ops_per_minute.unwrap_or(DEFAULT_MAX_OPS_PER_MINUTE),
            max_ops_per_hour: raw.max_ops_per_hour,
            read_only: raw.read_only.unwrap_or(DEFAULT_READ_ONLY),
            audit_enabled: raw.audit_enabled.unwrap_or(DEFAULT_AUDIT_ENABLED),
        })
    }
}

/// Logging configuration, independent of the security policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format ("json" or "text")
    pub format: String,
    /// Log output ("stdout", "stderr", "session_file")
    pub output: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
        }
    }
}

/// Resource limits applied by the CLI transport while reading and
/// executing a request — independent of the security policy, but still
/// part of the configuration a deployment tunes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    pub max_input_size_mb: u64,
    pub stdin_read_timeout_ms: u64,
    pub max_processing_time_ms: u64,
    pub max_json_depth: u32,
    pub max_execution_time_ms: u64,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_input_size_mb: 10,
            stdin_read_timeout_ms: 5_000,
            max_processing_time_ms: 10_000,
            max_json_depth: 32,
            max_execution_time_ms: 30_000,
        }
    }
}

/// Root on-disk configuration: the policy section plus ambient logging
/// settings. Read once at process start and then treated as immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawFenceConfig {
    policy: RawPolicyConfig,
    logging: LoggingConfig,
    limits: RequestLimits,
}

/// Fully validated configuration handed to `PolicyEngine` and the logging
/// subsystem at startup.
#[derive(Debug, Clone)]
pub struct FenceConfig {
    pub policy: PolicyConfig,
    pub logging: LoggingConfig,
    pub limits: RequestLimits,
}

impl FenceConfig {
    /// Parse and validate a configuration file's JSON contents.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawFenceConfig = serde_json::from_str(json)?;
        Ok(Self {
            policy: PolicyConfig::from_raw(raw.policy)?,
            logging: raw.logging,
            limits: raw.limits,
        })
    }

    /// Load and validate a configuration file from disk.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
                .into()
            } else {
                crate::error::FenceError::Io(e)
            }
        })?;
        Self::from_json_str(&contents)
    }

    /// Apply `FENCEFS_*` environment variable overrides on top of an
    /// already-loaded configuration.
    pub fn apply_env_overrides(&mut self, env_vars: &HashMap<String, String>) -> Result<()> {
        if let Some(val) = env_vars.get("FENCEFS_READ_ONLY") {
            self.policy.read_only = val.parse().map_err(|_| ConfigError::InvalidValue {
                field: "FENCEFS_READ_ONLY".into(),
                value: val.clone(),
                reason: "must be true or false".into(),
            })?;
        }
        if let Some(val) = env_vars.get("FENCEFS_MAX_OPS_PER_MINUTE") {
            self.policy.max_ops_per_minute =
                val.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "FENCEFS_MAX_OPS_PER_MINUTE".into(),
                    value: val.clone(),
                    reason: "must be a valid number".into(),
                })?;
        }
        if let Some(val) = env_vars.get("FENCEFS_LOG_LEVEL") {
            self.logging.level = val.clone();
        }
        Ok(())
    }

    /// Cross-field validation beyond what parsing already enforces.
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                value: self.logging.level.clone(),
                reason: "must be one of: trace, debug, info, warn, error".into(),
            }
            .into());
        }
        if self.policy.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "policy.max_file_size".into(),
                value: "0".into(),
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_log_output() -> String {
    "stderr".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = PolicyConfig::for_workspace(PathBuf::from("/tmp"));
        assert_eq!(cfg.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(cfg.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
        assert_eq!(cfg.max_ops_per_minute, DEFAULT_MAX_OPS_PER_MINUTE);
        assert!(!cfg.read_only);
        assert!(cfg.audit_enabled);
    }

    #[test]
    fn rejects_nonexistent_workspace_root() {
        let raw = RawPolicyConfig {
            workspace_root: PathBuf::from("/no/such/directory/hopefully"),
            ..Default::default()
        };
        assert!(PolicyConfig::from_raw(raw).is_err());
    }

    #[test]
    fn rejects_allowed_subdir_outside_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = RawPolicyConfig {
            workspace_root: tmp.path().to_path_buf(),
            allowed_subdirs: vec![PathBuf::from("/etc")],
            ..Default::default()
        };
        assert!(PolicyConfig::from_raw(raw).is_err());
    }

    #[test]
    fn raw_policy_config_accepts_documented_camel_case_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("src");
        std::fs::create_dir(&sub).unwrap();
        let json = format!(
            r#"{{
                "workspaceRoot": {:?},
                "allowedSubdirectories": [{:?}],
                "blockedPaths": [],
                "blockedPatterns": ["*.secret"],
                "maxFileSize": 1024,
                "maxBatchSize": 10,
                "maxOperationsPerMinute": 60,
                "enableAuditLog": false,
                "readOnly": true
            }}"#,
            tmp.path().to_string_lossy(),
            sub.to_string_lossy(),
        );
        let raw: RawPolicyConfig = serde_json::from_str(&json).unwrap();
        let cfg = PolicyConfig::from_raw(raw).unwrap();

        assert_eq!(cfg.allowed_subdirs, vec![sub]);
        assert_eq!(cfg.max_file_size, 1024);
        assert_eq!(cfg.max_batch_size, 10);
        assert_eq!(cfg.max_ops_per_minute, 60);
        assert!(!cfg.audit_enabled);
        assert!(cfg.read_only);
    }

    #[test]
    fn loads_from_json_with_logging_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let json = format!(
            r#"{{"policy": {{"workspaceRoot": {:?}}}}}"#,
            tmp.path().to_string_lossy()
        );
        let cfg = FenceConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.logging.level, "info");
        cfg.validate().unwrap();
    }

    #[test]
    fn env_override_changes_read_only() {
        let tmp = tempfile::tempdir().unwrap();
        let json = format!(
            r#"{{"policy": {{"workspaceRoot": {:?}}}}}"#,
            tmp.path().to_string_lossy()
        );
        let mut cfg = FenceConfig::from_json_str(&json).unwrap();
        let mut env = HashMap::new();
        env.insert("FENCEFS_READ_ONLY".to_string(), "true".to_string());
        cfg.apply_env_overrides(&env).unwrap();
        assert!(cfg.policy.read_only);
    }
}
