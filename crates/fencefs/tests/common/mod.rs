//! Common test utilities shared across the binary's integration tests.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

/// Builder for JSON request bodies fed to the binary over stdin.
pub struct FenceRequestBuilder {
    agent_id: String,
    fields: HashMap<String, Value>,
}

impl FenceRequestBuilder {
    pub fn new(agent_id: &str) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            fields: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> String {
        let mut body = json!({ "agent_id": self.agent_id });
        if let Some(obj) = body.as_object_mut() {
            for (key, value) in self.fields {
                obj.insert(key, value);
            }
        }
        body.to_string()
    }
}

/// Writes a minimal `fencefs.json` scoped to `workspace` and returns its path.
pub fn write_config(workspace: &Path) -> std::path::PathBuf {
    let config_path = workspace.join("fencefs.json");
    let json = json!({
        "policy": { "workspaceRoot": workspace }
    });
    std::fs::write(&config_path, json.to_string()).unwrap();
    config_path
}

/// A scratch workspace with a matching config file already on disk.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub config_path: std::path::PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(dir.path());
        Self { dir, config_path }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Exit code constants mirrored from `fencefs_core::ExitCode` for assertions
/// against the binary's process exit status.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const BLOCKING_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const SECURITY_ERROR: i32 = 4;
    pub const TIMEOUT_ERROR: i32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_agent_id_and_extra_fields() {
        let body = FenceRequestBuilder::new("agent-1")
            .with("path", json!("notes.txt"))
            .build();
        assert!(body.contains("\"agent_id\":\"agent-1\""));
        assert!(body.contains("\"path\":\"notes.txt\""));
    }
}
