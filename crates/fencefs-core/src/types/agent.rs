//! Agent identity and rate-limiting state
//!
//! fencefs is agent-agnostic: an agent is just an opaque identifier that
//! the transport layer attaches to every request so `RateLimiter` can
//! account for it and `PolicyEngine` can attribute audit lines to it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Opaque identifier for the caller issuing a request.
///
/// Agent ids follow the format `agent_{uuid}`, but callers may also supply
/// their own transport-level identifier; `RateLimiter` keys its windows off
/// whatever string value is provided here.
///
/// # Example
///
/// ```
/// use fencefs_core::AgentId;
///
/// let id = AgentId::generate();
/// assert!(id.is_valid());
/// assert!(id.as_str().starts_with("agent_"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

crate::impl_id_type!(AgentId, "agent");

impl AgentId {
    /// Wrap an arbitrary caller-supplied identifier without validating the
    /// `agent_{uuid}` format — used when the transport layer already has a
    /// stable per-caller id it wants rate-limited.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Sliding-window request-timestamp state for one agent.
///
/// `minute_hits` holds millisecond epoch timestamps within the trailing 60
/// seconds; entries are pruned lazily on each `check`/`record` call rather
/// than on a background timer. `hour_hits` is optional and, when present,
/// follows the same pruning discipline against a 3 600 000 ms window.
#[derive(Debug, Clone, Default)]
pub struct AgentRateState {
    pub minute_hits: VecDeque<i64>,
    pub hour_hits: Option<VecDeque<i64>>,
}

impl AgentRateState {
    pub fn new(track_hourly: bool) -> Self {
        Self {
            minute_hits: VecDeque::new(),
            hour_hits: track_hourly.then(VecDeque::new),
        }
    }

    /// Drop entries older than their respective windows, measured back from `now`.
    pub fn prune(&mut self, now: i64, minute_window_ms: i64, hour_window_ms: i64) {
        while matches!(self.minute_hits.front(), Some(&t) if now - t >= minute_window_ms) {
            self.minute_hits.pop_front();
        }
        if let Some(hour_hits) = self.hour_hits.as_mut() {
            while matches!(hour_hits.front(), Some(&t) if now - t >= hour_window_ms) {
                hour_hits.pop_front();
            }
        }
    }

    /// Append `now` to both windows, lazily starting hourly tracking on
    /// first use (cheap enough that we don't gate it on a config flag).
    pub fn record(&mut self, now: i64) {
        self.minute_hits.push_back(now);
        self.hour_hits.get_or_insert_with(VecDeque::new).push_back(now);
    }

    pub fn minute_count(&self) -> usize {
        self.minute_hits.len()
    }

    pub fn hour_count(&self) -> usize {
        self.hour_hits.as_ref().map_or(0, VecDeque::len)
    }
}
