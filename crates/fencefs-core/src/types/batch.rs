//! Batch operation and rollback record types
//!
//! `BatchOp` is the unit `BatchExecutor` (see [`crate::batch`]) sequences;
//! `RollbackRecord` captures exactly enough state per executed op to reverse
//! it during atomic-mode rollback.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The effect a single batch operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOpKind {
    Copy,
    Move,
    Delete,
}

/// One entry in a batch request.
///
/// Invariant: `destination` is required iff `kind != BatchOpKind::Delete`.
/// Construction should go through [`BatchOp::new`], which enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOp {
    pub kind: BatchOpKind,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
}

impl BatchOp {
    /// Build a batch op, rejecting shapes that violate the
    /// destination-required-iff-not-delete invariant.
    pub fn new(
        kind: BatchOpKind,
        source: PathBuf,
        destination: Option<PathBuf>,
    ) -> Result<Self, String> {
        match (kind, &destination) {
            (BatchOpKind::Delete, Some(_)) => {
                Err("delete operations must not specify a destination".to_string())
            }
            (BatchOpKind::Copy | BatchOpKind::Move, None) => Err(format!(
                "{kind:?} operations require a destination"
            )),
            _ => Ok(Self {
                kind,
                source,
                destination,
            }),
        }
    }
}

/// Per-op outcome returned from a non-atomic (or successfully completed
/// atomic) `execute_batch` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOpResult {
    pub index: usize,
    pub op: BatchOp,
    pub success: bool,
    pub error: Option<String>,
}

/// State captured after executing one `BatchOp`, sufficient to reverse it.
///
/// Owned exclusively by `BatchExecutor` for the lifetime of one
/// `execute_batch` call; discarded on success, consumed by rollback on
/// failure.
#[derive(Debug, Clone)]
pub enum RollbackRecord {
    /// `copy`: whether the destination was newly created by this op (if
    /// so, rollback deletes it; if the destination pre-existed as a
    /// directory merge target, rollback leaves it alone).
    Copy {
        destination: PathBuf,
        newly_created: bool,
    },
    /// `move`: the original source path, the destination, and the
    /// shadow-backup path of any pre-existing destination (renamed aside
    /// before the move).
    Move {
        source: PathBuf,
        destination: PathBuf,
        shadow_backup: Option<PathBuf>,
    },
    /// `delete`: the shadow-backup path holding the original contents.
    Delete {
        source: PathBuf,
        shadow_backup: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_with_destination_is_rejected() {
        let result = BatchOp::new(
            BatchOpKind::Delete,
            PathBuf::from("/ws/a"),
            Some(PathBuf::from("/ws/b")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn copy_without_destination_is_rejected() {
        let result = BatchOp::new(BatchOpKind::Copy, PathBuf::from("/ws/a"), None);
        assert!(result.is_err());
    }

    #[test]
    fn valid_move_is_accepted() {
        let op = BatchOp::new(
            BatchOpKind::Move,
            PathBuf::from("/ws/a"),
            Some(PathBuf::from("/ws/b")),
        )
        .unwrap();
        assert_eq!(op.kind, BatchOpKind::Move);
    }
}
