//! Vetted path and operation-kind types
//!
//! A [`VettedPath`] is the only currency filesystem effects are allowed to
//! spend: it can only be constructed by `path::resolver`, after every layer
//! of the validation pipeline has accepted the input.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The kind of effect a resolved path will be used for.
///
/// The read-only guard and several rejection layers key off this value, so
/// it must be supplied up front rather than inferred from the operation
/// that eventually runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Read,
    Write,
    Delete,
}

impl OperationKind {
    /// Whether this operation kind is subject to the read-only guard.
    pub fn is_mutating(self) -> bool {
        matches!(self, OperationKind::Write | OperationKind::Delete)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OperationKind::Read => "read",
            OperationKind::Write => "write",
            OperationKind::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// A path that has passed every layer of the path validation pipeline for a
/// specific [`OperationKind`].
///
/// `VettedPath` intentionally has no public constructor outside this crate's
/// `path::resolver` module — every filesystem effect in `fencefs-core`
/// accepts a `&VettedPath`, never a raw `Path`, so there is no way to reach
/// the filesystem without going through the policy layer first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VettedPath {
    path: PathBuf,
    operation: OperationKind,
}

impl VettedPath {
    /// Construct a vetted path. Restricted to the crate: only
    /// `path::resolver::PathResolver::resolve` should call this.
    pub(crate) fn new(path: PathBuf, operation: OperationKind) -> Self {
        Self { path, operation }
    }

    /// The absolute, resolved filesystem path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// The operation kind this path was vetted for.
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Consume the vetted path, returning the owned `PathBuf`.
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl std::fmt::Display for VettedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
