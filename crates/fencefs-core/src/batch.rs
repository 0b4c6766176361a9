//! `BatchExecutor`: sequential, optionally-atomic multi-op filesystem
//! transactions with best-effort rollback (§4.D).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::SHADOW_BACKUP_PREFIX;
use crate::dirops;
use crate::error::{FsError, OperationError, Result};
use crate::policy::PolicyEngine;
use crate::types::agent::AgentId;
use crate::types::batch::{BatchOp, BatchOpKind, BatchOpResult, RollbackRecord};
use crate::types::path::{OperationKind, VettedPath};

static SHADOW_COUNTER: AtomicU64 = AtomicU64::new(0);

fn shadow_backup_path(target: &Path) -> PathBuf {
    let suffix = SHADOW_COUNTER.fetch_add(1, Ordering::SeqCst);
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    target.with_file_name(format!("{name}{SHADOW_BACKUP_PREFIX}{suffix}"))
}

/// Sequential executor for a list of [`BatchOp`]s, vetting every source and
/// destination through a [`PolicyEngine`] before touching disk.
pub struct BatchExecutor<'a> {
    policy: &'a PolicyEngine,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(policy: &'a PolicyEngine) -> Self {
        Self { policy }
    }

    /// Run `ops` in order. In atomic mode, a pre-validation pass vets every
    /// op and checks the batch size guard before any disk access; a runtime
    /// failure then rolls every already-executed op back, in reverse order,
    /// and raises `BATCH_FAILED`. In non-atomic mode, each op's outcome is
    /// captured independently and execution continues past failures.
    pub fn execute_batch(
        &self,
        ops: &[BatchOp],
        atomic: bool,
        agent: &AgentId,
    ) -> Result<Vec<BatchOpResult>> {
        if atomic {
            self.pre_validate(ops, agent)?;
        }

        let mut results = Vec::with_capacity(ops.len());
        let mut rollback_records = Vec::new();

        for (index, op) in ops.iter().enumerate() {
            match self.execute_one(op, agent) {
                Ok(record) => {
                    rollback_records.push(record);
                    self.policy.note(
                        "batch_op",
                        &op_paths(op),
                        "success",
                        agent,
                    );
                    results.push(BatchOpResult {
                        index,
                        op: op.clone(),
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    if atomic {
                        self.rollback(&rollback_records);
                        return Err(OperationError::BatchFailed {
                            index,
                            reason: e.to_string(),
                        }
                        .into());
                    }
                    results.push(BatchOpResult {
                        index,
                        op: op.clone(),
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(results)
    }

    fn pre_validate(&self, ops: &[BatchOp], agent: &AgentId) -> Result<()> {
        let mut total_bytes: u64 = 0;
        for op in ops {
            self.policy.vet(&op.source, source_operation(op.kind), agent)?;
            if let Some(destination) = &op.destination {
                self.policy.vet(destination, OperationKind::Write, agent)?;
            }
            if let Ok(metadata) = fs::symlink_metadata(&op.source) {
                total_bytes += metadata.len();
            }
        }
        self.policy.guard_batch(total_bytes, ops.len(), agent)?;
        Ok(())
    }

    fn execute_one(&self, op: &BatchOp, agent: &AgentId) -> Result<RollbackRecord> {
        match op.kind {
            BatchOpKind::Copy => self.execute_copy(op, agent),
            BatchOpKind::Move => self.execute_move(op, agent),
            BatchOpKind::Delete => self.execute_delete(op, agent),
        }
    }

    fn execute_copy(&self, op: &BatchOp, agent: &AgentId) -> Result<RollbackRecord> {
        let destination = op
            .destination
            .as_ref()
            .expect("BatchOp::new enforces destination for copy");

        let vetted_source = self.policy.vet(&op.source, OperationKind::Read, agent)?;
        let vetted_destination = self.policy.vet(destination, OperationKind::Write, agent)?;

        if !vetted_source.as_path().exists() {
            return Err(FsError::NotFound {
                path: vetted_source.as_path().display().to_string(),
            }
            .into());
        }
        let newly_created = !vetted_destination.as_path().exists();

        if let Some(parent) = vetted_destination.as_path().parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::from_io(&e, parent.display().to_string()))?;
        }

        if vetted_source.as_path().is_dir() {
            dirops::copy_recursive(&vetted_source, &vetted_destination, true, &[])?;
        } else {
            fs::copy(vetted_source.as_path(), vetted_destination.as_path())
                .map_err(|e| FsError::from_io(&e, vetted_destination.as_path().display().to_string()))?;
        }

        Ok(RollbackRecord::Copy {
            destination: vetted_destination.into_path_buf(),
            newly_created,
        })
    }

    fn execute_move(&self, op: &BatchOp, agent: &AgentId) -> Result<RollbackRecord> {
        let destination = op
            .destination
            .as_ref()
            .expect("BatchOp::new enforces destination for move");

        let vetted_source = self.policy.vet(&op.source, OperationKind::Read, agent)?;
        let vetted_destination = self.policy.vet(destination, OperationKind::Write, agent)?;

        let shadow_backup = if vetted_destination.as_path().exists() {
            let shadow = shadow_backup_path(vetted_destination.as_path());
            fs::rename(vetted_destination.as_path(), &shadow)
                .map_err(|e| FsError::from_io(&e, shadow.display().to_string()))?;
            Some(shadow)
        } else {
            None
        };

        if let Some(parent) = vetted_destination.as_path().parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::from_io(&e, parent.display().to_string()))?;
        }

        fs::rename(vetted_source.as_path(), vetted_destination.as_path()).map_err(|e| {
            FsError::from_io(&e, vetted_destination.as_path().display().to_string())
        })?;

        Ok(RollbackRecord::Move {
            source: vetted_source.into_path_buf(),
            destination: vetted_destination.into_path_buf(),
            shadow_backup,
        })
    }

    fn execute_delete(&self, op: &BatchOp, agent: &AgentId) -> Result<RollbackRecord> {
        let vetted_source = self.policy.vet(&op.source, OperationKind::Delete, agent)?;
        let shadow_backup = shadow_backup_path(vetted_source.as_path());
        fs::rename(vetted_source.as_path(), &shadow_backup)
            .map_err(|e| FsError::from_io(&e, shadow_backup.display().to_string()))?;

        Ok(RollbackRecord::Delete {
            source: vetted_source.into_path_buf(),
            shadow_backup,
        })
    }

    /// Permanently remove shadow-backup files under `root` whose
    /// modification time is at least `older_than_secs` old. Returns the
    /// number of files removed.
    pub fn sweep_shadow_backups(
        &self,
        root: &VettedPath,
        older_than_secs: u64,
        agent: &AgentId,
    ) -> Result<u64> {
        let now = std::time::SystemTime::now();
        let mut removed = 0u64;

        for entry in walkdir::WalkDir::new(root.as_path())
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if !entry.file_name().to_string_lossy().contains(SHADOW_BACKUP_PREFIX) {
                continue;
            }
            let Ok(metadata) = entry.metadata() else { continue };
            let Ok(modified) = metadata.modified() else { continue };
            let age = now.duration_since(modified).unwrap_or_default();
            if age.as_secs() < older_than_secs {
                continue;
            }
            if fs::remove_file(entry.path()).is_ok() {
                removed += 1;
                self.policy.note(
                    "sweep_shadow_backups",
                    &[entry.path().to_path_buf()],
                    "success",
                    agent,
                );
            }
        }

        Ok(removed)
    }

    /// Reverse every record in `records`, in reverse order. Best-effort: a
    /// failure on one rollback step is logged but does not stop the rest.
    fn rollback(&self, records: &[RollbackRecord]) {
        for record in records.iter().rev() {
            let outcome = match record {
                RollbackRecord::Copy {
                    destination,
                    newly_created,
                } => {
                    if *newly_created {
                        remove_path(destination)
                    } else {
                        Ok(())
                    }
                }
                RollbackRecord::Move {
                    source,
                    destination,
                    shadow_backup,
                } => fs::rename(destination, source)
                    .map_err(|e| FsError::from_io(&e, source.display().to_string()))
                    .and_then(|_| {
                        if let Some(shadow) = shadow_backup {
                            fs::rename(shadow, destination).map_err(|e| {
                                FsError::from_io(&e, destination.display().to_string())
                            })?;
                        }
                        Ok(())
                    }),
                RollbackRecord::Delete {
                    source,
                    shadow_backup,
                } => fs::rename(shadow_backup, source)
                    .map_err(|e| FsError::from_io(&e, source.display().to_string())),
            };
            if let Err(e) = outcome {
                tracing::warn!(error = %e, "rollback step failed, continuing");
            }
        }
    }
}

fn remove_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path).map_err(|e| FsError::from_io(&e, path.display().to_string()).into())
    } else {
        fs::remove_file(path).map_err(|e| FsError::from_io(&e, path.display().to_string()).into())
    }
}

fn source_operation(kind: BatchOpKind) -> OperationKind {
    match kind {
        BatchOpKind::Copy => OperationKind::Read,
        BatchOpKind::Move => OperationKind::Read,
        BatchOpKind::Delete => OperationKind::Delete,
    }
}

fn op_paths(op: &BatchOp) -> Vec<PathBuf> {
    let mut paths = vec![op.source.clone()];
    if let Some(destination) = &op.destination {
        paths.push(destination.clone());
    }
    paths
}
