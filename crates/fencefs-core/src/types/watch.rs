//! Watch session and filesystem event types
//!
//! These types back `WatchRegistry` (see [`crate::watch`]): a session is a
//! live subscription to filesystem events rooted at one directory, and its
//! event buffer is the only state a session consumer ever touches directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a watch session.
///
/// Session ids follow the format `watch_{uuid}`.
///
/// # Example
///
/// ```
/// use fencefs_core::WatchSessionId;
///
/// let id = WatchSessionId::generate();
/// assert!(id.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchSessionId(String);

crate::impl_id_type!(WatchSessionId, "watch");

/// The kind of filesystem change a buffered [`FsEvent`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsEventKind {
    Create,
    Modify,
    Delete,
    Rename,
}

/// A single observed filesystem change, classified and timestamped.
///
/// `old_path` is populated only for [`FsEventKind::Rename`], and only when
/// the underlying watch facility supplies the old/new pairing; otherwise a
/// rename surfaces as a `delete` followed by a `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsEvent {
    pub kind: FsEventKind,
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub old_path: Option<PathBuf>,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: PathBuf, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            path,
            timestamp,
            old_path: None,
        }
    }

    pub fn renamed(old_path: PathBuf, new_path: PathBuf, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: FsEventKind::Rename,
            path: new_path,
            timestamp,
            old_path: Some(old_path),
        }
    }
}

/// A live subscription to filesystem events rooted at `root`.
///
/// Invariant: a session id is unique across live sessions for the lifetime
/// of the owning `WatchRegistry`; stopping a session discards its buffer.
#[derive(Debug)]
pub struct WatchSession {
    pub id: WatchSessionId,
    pub root: PathBuf,
    pub recursive: bool,
    pub filters: Vec<String>,
    pub event_buffer: Vec<FsEvent>,
}

impl WatchSession {
    pub fn new(id: WatchSessionId, root: PathBuf, recursive: bool, filters: Vec<String>) -> Self {
        Self {
            id,
            root,
            recursive,
            filters,
            event_buffer: Vec::new(),
        }
    }
}
