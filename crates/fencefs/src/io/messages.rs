//! JSON request/response envelope for the fencefs CLI transport.
//!
//! [`FenceRequest`] is one flat struct carrying `agent_id` plus every
//! operation's optional parameters, the same shape Claude Code hook tools
//! used for their request payloads — only the field set changed, to match
//! the twelve filesystem operations instead of eight hook events.

use std::path::PathBuf;

use fencefs_core::error::{Result, ValidationError};
use fencefs_core::search::SearchType;
use fencefs_core::BatchOp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request payload read from stdin for every `fencefs` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FenceRequest {
    /// Identity used for rate limiting and audit attribution.
    pub agent_id: String,

    // ===== batch_operations =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops: Option<Vec<BatchOp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atomic: Option<bool>,

    // ===== watch_directory / get_watch_events / stop_watch =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear: Option<bool>,

    // ===== search_files / build_index =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_after: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_content: Option<bool>,

    // ===== create_symlink =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    // ===== compute_checksum / verify_checksum =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    // ===== analyze_disk_usage =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by_type: Option<bool>,

    // ===== copy_directory / sync_directory =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,

    // ===== admin emergency-stop =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub older_than_secs: Option<u64>,
}

fn missing(field: &str) -> fencefs_core::error::FenceError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
    .into()
}

impl FenceRequest {
    pub fn require_path(&self) -> Result<&PathBuf> {
        self.path.as_ref().ok_or_else(|| missing("path"))
    }

    pub fn require_source(&self) -> Result<&PathBuf> {
        self.source.as_ref().ok_or_else(|| missing("source"))
    }

    pub fn require_destination(&self) -> Result<&PathBuf> {
        self.destination.as_ref().ok_or_else(|| missing("destination"))
    }

    pub fn require_link(&self) -> Result<&PathBuf> {
        self.link.as_ref().ok_or_else(|| missing("link"))
    }

    pub fn require_target(&self) -> Result<&PathBuf> {
        self.target.as_ref().ok_or_else(|| missing("target"))
    }

    pub fn require_ops(&self) -> Result<&[BatchOp]> {
        self.ops.as_deref().ok_or_else(|| missing("ops"))
    }

    pub fn require_session_id(&self) -> Result<&str> {
        self.session_id.as_deref().ok_or_else(|| missing("session_id"))
    }

    pub fn require_query(&self) -> Result<&str> {
        self.query.as_deref().ok_or_else(|| missing("query"))
    }

    pub fn require_algorithm(&self) -> Result<&str> {
        self.algorithm.as_deref().ok_or_else(|| missing("algorithm"))
    }

    pub fn require_expected(&self) -> Result<&str> {
        self.expected.as_deref().ok_or_else(|| missing("expected"))
    }

    pub fn compile_exclusions(&self) -> Result<Vec<globset::GlobMatcher>> {
        let Some(patterns) = &self.exclusions else {
            return Ok(Vec::new());
        };
        patterns
            .iter()
            .map(|p| {
                globset::Glob::new(p)
                    .map(|g| g.compile_matcher())
                    .map_err(|e| ValidationError::InvalidPattern {
                        pattern: p.clone(),
                        reason: e.to_string(),
                    }
                    .into())
            })
            .collect()
    }
}

/// Response written to stdout for every `fencefs` subcommand.
#[derive(Debug, Clone, Serialize)]
pub struct FenceResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FenceResponse {
    pub fn ok<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
