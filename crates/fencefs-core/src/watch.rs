//! `WatchRegistry`: per-session buffered filesystem-event streams (§4.F).
//!
//! Each session owns a live `notify` watcher and a buffer one producer (the
//! watch callback) and one consumer (`get_events`) can touch concurrently.
//! The registry itself holds only opaque session ids; callers never see the
//! underlying `notify::RecommendedWatcher`.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;

use crate::error::{OperationError, Result, ValidationError};
use crate::types::path::VettedPath;
use crate::types::watch::{FsEvent, FsEventKind, WatchSession, WatchSessionId};

struct SessionHandle {
    session: Arc<Mutex<WatchSession>>,
    // Kept alive for the session's lifetime; dropping it stops the watch.
    _watcher: RecommendedWatcher,
}

/// Owns every live watch session. Shared across requests behind a `DashMap`
/// keyed by session id, so starting/stopping one session never blocks
/// access to another.
#[derive(Default)]
pub struct WatchRegistry {
    sessions: DashMap<WatchSessionId, SessionHandle>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Start a new session at `id`, watching `root` (already vetted).
    /// Rejects `SESSION_EXISTS` if `id` names a currently live session.
    pub fn start(
        &self,
        id: WatchSessionId,
        root: &VettedPath,
        recursive: bool,
        filters: Vec<String>,
    ) -> Result<()> {
        if self.sessions.contains_key(&id) {
            return Err(OperationError::SessionExists {
                session_id: id.to_string(),
            }
            .into());
        }

        let compiled = compile_filters(&filters)?;
        let buffer = Arc::new(Mutex::new(WatchSession::new(
            id.clone(),
            root.as_path().to_path_buf(),
            recursive,
            filters,
        )));

        let buffer_for_callback = Arc::clone(&buffer);
        let filters_for_callback = compiled;
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "watch callback received an error");
                    return;
                }
            };
            let classified = classify_event(event);
            let mut session = buffer_for_callback.lock();
            for fs_event in classified {
                if matches_filters(&filters_for_callback, &fs_event.path) {
                    session.event_buffer.push(fs_event);
                }
            }
        })
        .map_err(|e| OperationError::Other(format!("failed to start watcher: {e}")))?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(root.as_path(), mode)
            .map_err(|e| OperationError::Other(format!("failed to watch path: {e}")))?;

        self.sessions.insert(
            id,
            SessionHandle {
                session: buffer,
                _watcher: watcher,
            },
        );
        Ok(())
    }

    /// Snapshot the current buffer without clearing it.
    pub fn get_events(&self, id: &WatchSessionId) -> Result<Vec<FsEvent>> {
        let entry = self.sessions.get(id).ok_or_else(|| OperationError::SessionNotFound {
            session_id: id.to_string(),
        })?;
        Ok(entry.session.lock().event_buffer.clone())
    }

    /// Empty a session's buffer in place.
    pub fn clear_events(&self, id: &WatchSessionId) -> Result<()> {
        let entry = self.sessions.get(id).ok_or_else(|| OperationError::SessionNotFound {
            session_id: id.to_string(),
        })?;
        entry.session.lock().event_buffer.clear();
        Ok(())
    }

    /// Release the underlying watcher and discard the buffer.
    pub fn stop(&self, id: &WatchSessionId) -> Result<()> {
        self.sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| {
                OperationError::SessionNotFound {
                    session_id: id.to_string(),
                }
                .into()
            })
    }

    /// Release every live session.
    pub fn stop_all(&self) {
        self.sessions.clear();
    }

    /// Number of currently live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn compile_filters(filters: &[String]) -> Result<Vec<globset::GlobMatcher>> {
    filters
        .iter()
        .map(|pattern| {
            globset::Glob::new(pattern)
                .map(|g| g.compile_matcher())
                .map_err(|e| {
                    ValidationError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    }
                    .into()
                })
        })
        .collect()
}

fn matches_filters(filters: &[globset::GlobMatcher], path: &PathBuf) -> bool {
    filters.is_empty() || filters.iter().any(|glob| glob.is_match(path))
}

/// Classify one `notify::Event` into zero or more [`FsEvent`]s. A paired
/// rename (`RenameMode::Both`) yields a single `Rename` event; an unpaired
/// rename half (`From`/`To`) degrades to a `Delete`/`Create` respectively,
/// per the platform-pairing caveat in §4.F.
fn classify_event(event: Event) -> Vec<FsEvent> {
    let now = chrono::Utc::now();
    match event.kind {
        EventKind::Create(_) => event
            .paths
            .into_iter()
            .map(|path| FsEvent::new(FsEventKind::Create, path, now))
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .into_iter()
            .map(|path| FsEvent::new(FsEventKind::Delete, path, now))
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if event.paths.len() == 2 {
                vec![FsEvent::renamed(
                    event.paths[0].clone(),
                    event.paths[1].clone(),
                    now,
                )]
            } else {
                event
                    .paths
                    .into_iter()
                    .map(|path| FsEvent::new(FsEventKind::Modify, path, now))
                    .collect()
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => event
            .paths
            .into_iter()
            .map(|path| FsEvent::new(FsEventKind::Delete, path, now))
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event
            .paths
            .into_iter()
            .map(|path| FsEvent::new(FsEventKind::Create, path, now))
            .collect(),
        EventKind::Modify(_) => event
            .paths
            .into_iter()
            .map(|path| FsEvent::new(FsEventKind::Modify, path, now))
            .collect(),
        _ => Vec::new(),
    }
}
