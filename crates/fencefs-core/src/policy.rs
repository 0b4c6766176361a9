//! `PolicyEngine`: the single façade every higher-level component vets
//! filesystem effects through (§4.C).
//!
//! No component outside this module is meant to hold a `PathResolver` or
//! `RateLimiter` directly — `BatchExecutor`, `DirectoryOps`, `WatchRegistry`,
//! and `AuxOps` all take a `&PolicyEngine` and call `vet*`/`guard*`/`note`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::config::PolicyConfig;
use crate::error::{Result, SecurityError};
use crate::path::PathResolver;
use crate::security::RateLimiter;
use crate::types::agent::AgentId;
use crate::types::path::{OperationKind, VettedPath};

/// The façade described in §4.C: every filesystem-affecting call in this
/// crate goes through one of `vet`, `vet_symlink`, `guard_file_size`,
/// `guard_batch`, and emits an audit line via `note` or the rejection path.
pub struct PolicyEngine {
    config: PolicyConfig,
    resolver: PathResolver,
    rate_limiter: RateLimiter,
    emergency_stop: AtomicBool,
    emergency_read_only: AtomicBool,
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        let rate_limiter = RateLimiter::from_policy(&config);
        Self {
            config,
            resolver: PathResolver::new(),
            rate_limiter,
            emergency_stop: AtomicBool::new(false),
            emergency_read_only: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Administrative entry point: reject every `vet*` call immediately.
    pub fn set_emergency_stop(&self, active: bool) {
        self.emergency_stop.store(active, Ordering::SeqCst);
    }

    /// Administrative entry point: reject mutating `vet*` calls, allow reads.
    pub fn set_emergency_read_only(&self, active: bool) {
        self.emergency_read_only.store(active, Ordering::SeqCst);
    }

    /// Vet `path` for `kind` on behalf of `agent`: rate-limit, then resolve
    /// through the full path pipeline. Emits a `SECURITY_VIOLATION` audit
    /// line on rejection.
    pub fn vet(&self, path: &Path, kind: OperationKind, agent: &AgentId) -> Result<VettedPath> {
        if self.emergency_stop.load(Ordering::SeqCst) {
            let err = SecurityError::EmergencyStop;
            self.audit_violation(&err, path, None);
            return Err(err.into());
        }
        if self.emergency_read_only.load(Ordering::SeqCst) && kind.is_mutating() {
            let err = SecurityError::EmergencyReadOnly;
            self.audit_violation(&err, path, None);
            return Err(err.into());
        }

        let now = Utc::now().timestamp_millis();
        if let Err(e) = self.rate_limiter.check(agent, now) {
            self.audit_from_error(&e, path, None);
            return Err(e);
        }

        match self.resolver.resolve(path, kind, &self.config) {
            Ok(vetted) => {
                self.rate_limiter.record(agent, now);
                Ok(vetted)
            }
            Err(e) => {
                self.audit_from_error(&e, path, None);
                Err(e)
            }
        }
    }

    /// Vet a symlink creation: the link path must be writable, and the
    /// target must itself resolve under policy — a link is refused if its
    /// target would be rejected (§8 P5: every created symlink's target
    /// canonicalizes under the workspace root).
    pub fn vet_symlink(
        &self,
        link: &Path,
        target: &Path,
        agent: &AgentId,
    ) -> Result<(VettedPath, VettedPath)> {
        let vetted_link = self.vet(link, OperationKind::Write, agent)?;
        match self.vet(target, OperationKind::Read, agent) {
            Ok(vetted_target) => Ok((vetted_link, vetted_target)),
            Err(e) => {
                let target_str = target.to_string_lossy().into_owned();
                let err = SecurityError::SymlinkEscape {
                    raw_input: link.to_string_lossy().into_owned(),
                    resolved: vetted_link.as_path().to_string_lossy().into_owned(),
                    target: target_str,
                };
                self.audit_violation(&err, link, None);
                let _ = e;
                Err(err.into())
            }
        }
    }

    /// Reject `FILE_SIZE` if `size` exceeds the configured `max_file_size`.
    pub fn guard_file_size(&self, size: u64, agent: &AgentId) -> Result<()> {
        let result = RateLimiter::guard_file_size(size, self.config.max_file_size);
        if let Err(ref e) = result {
            self.audit_from_error(e, Path::new(""), None);
        }
        let _ = agent;
        result
    }

    /// Reject `BATCH_SIZE` if cumulative bytes or op count exceed their caps.
    pub fn guard_batch(&self, total_bytes: u64, op_count: usize, agent: &AgentId) -> Result<()> {
        let result =
            RateLimiter::guard_batch(total_bytes, op_count, self.config.max_batch_size, None);
        if let Err(ref e) = result {
            self.audit_from_error(e, Path::new(""), None);
        }
        let _ = agent;
        result
    }

    /// Emit a success audit line: `{timestamp, level: AUDIT, operation, paths, result}`.
    pub fn note(&self, operation_name: &str, paths: &[PathBuf], result: &str, agent: &AgentId) {
        if !self.config.audit_enabled {
            return;
        }
        let paths_display: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        tracing::info!(
            target: "audit",
            timestamp = %Utc::now().to_rfc3339(),
            level = "AUDIT",
            operation = operation_name,
            paths = ?paths_display,
            result,
            agent_id = %agent,
            "operation completed"
        );
    }

    fn audit_from_error(&self, err: &crate::error::FenceError, input: &Path, resolved: Option<&str>) {
        if let crate::error::FenceError::Security(sec) = err {
            self.audit_violation(sec, input, resolved);
        }
    }

    fn audit_violation(&self, err: &SecurityError, input: &Path, resolved: Option<&str>) {
        if !self.config.audit_enabled {
            return;
        }
        let resolved = resolved.map(str::to_string).or_else(|| err.resolved().map(str::to_string));
        tracing::warn!(
            target: "audit",
            timestamp = %Utc::now().to_rfc3339(),
            level = "SECURITY_VIOLATION",
            r#type = err.audit_type(),
            input = %input.display(),
            resolved = resolved.as_deref().unwrap_or_default(),
            workspace_root = %self.config.workspace_root.display(),
            "security rejection"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(root: &Path) -> PolicyEngine {
        PolicyEngine::new(PolicyConfig::for_workspace(root.to_path_buf()))
    }

    #[test]
    fn vets_path_within_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"x").unwrap();
        let engine = engine(tmp.path());
        let agent = AgentId::generate();
        let vetted = engine
            .vet(Path::new("a.txt"), OperationKind::Read, &agent)
            .unwrap();
        assert!(vetted.as_path().starts_with(tmp.path()));
    }

    #[test]
    fn emergency_stop_rejects_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine(tmp.path());
        let agent = AgentId::generate();
        engine.set_emergency_stop(true);
        let err = engine
            .vet(Path::new("a.txt"), OperationKind::Read, &agent)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::FenceError::Security(SecurityError::EmergencyStop)
        ));
    }

    #[test]
    fn emergency_read_only_allows_reads_blocks_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine(tmp.path());
        let agent = AgentId::generate();
        engine.set_emergency_read_only(true);
        assert!(engine
            .vet(Path::new("a.txt"), OperationKind::Read, &agent)
            .is_ok());
        let err = engine
            .vet(Path::new("a.txt"), OperationKind::Write, &agent)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::FenceError::Security(SecurityError::EmergencyReadOnly)
        ));
    }

    #[test]
    fn vet_symlink_accepts_target_under_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("target.txt"), b"x").unwrap();
        let engine = engine(tmp.path());
        let agent = AgentId::generate();
        let (link, target) = engine
            .vet_symlink(Path::new("link"), Path::new("target.txt"), &agent)
            .unwrap();
        assert!(link.as_path().starts_with(tmp.path()));
        assert!(target.as_path().starts_with(tmp.path()));
    }

    #[test]
    fn vet_symlink_rejects_target_outside_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine(tmp.path());
        let agent = AgentId::generate();
        let err = engine
            .vet_symlink(Path::new("link"), Path::new("/etc/passwd"), &agent)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::FenceError::Security(SecurityError::SymlinkEscape { .. })
        ));
    }

    #[test]
    fn guard_file_size_rejects_oversized() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = PolicyConfig::for_workspace(tmp.path().to_path_buf());
        config.max_file_size = 10;
        let engine = PolicyEngine::new(config);
        let agent = AgentId::generate();
        assert!(engine.guard_file_size(5, &agent).is_ok());
        assert!(engine.guard_file_size(50, &agent).is_err());
    }
}
