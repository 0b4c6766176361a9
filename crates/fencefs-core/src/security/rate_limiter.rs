//! Sliding-window rate limiting and size guards (§4.B).
//!
//! `RateLimiter` holds one [`AgentRateState`] per agent behind a
//! [`dashmap::DashMap`] so concurrent callers don't serialize on a single
//! lock. `check`/`record` are split, mirroring the contract: a caller
//! checks capacity, performs the operation, and only then records it —
//! so a rejected operation never consumes quota.

use dashmap::DashMap;

use crate::constants::{RATE_LIMIT_HOUR_WINDOW_MS, RATE_LIMIT_MINUTE_WINDOW_MS};
use crate::error::{OperationError, Result, SecurityError};
use crate::types::agent::{AgentId, AgentRateState};

/// Per-agent sliding-window operation limiter plus size guards.
///
/// Constructed once from a [`crate::config::PolicyConfig`] snapshot and
/// owned for the lifetime of the `PolicyEngine` that vets through it.
#[derive(Debug)]
pub struct RateLimiter {
    state: DashMap<AgentId, AgentRateState>,
    max_ops_per_minute: u32,
    max_ops_per_hour: Option<u32>,
}

impl RateLimiter {
    pub fn new(max_ops_per_minute: u32, max_ops_per_hour: Option<u32>) -> Self {
        Self {
            state: DashMap::new(),
            max_ops_per_minute,
            max_ops_per_hour,
        }
    }

    /// Build a limiter from a policy's configured limits.
    pub fn from_policy(policy: &crate::config::PolicyConfig) -> Self {
        Self::new(policy.max_ops_per_minute, policy.max_ops_per_hour)
    }

    /// Check whether `agent_id` has remaining capacity at time `now`
    /// (milliseconds since epoch), without consuming it.
    pub fn check(&self, agent_id: &AgentId, now: i64) -> Result<()> {
        let mut entry = self.state.entry(agent_id.clone()).or_default();
        entry.prune(now, RATE_LIMIT_MINUTE_WINDOW_MS, RATE_LIMIT_HOUR_WINDOW_MS);

        if entry.minute_count() >= self.max_ops_per_minute as usize {
            return Err(SecurityError::RateLimit {
                agent_id: agent_id.to_string(),
            }
            .into());
        }
        if let Some(max_hour) = self.max_ops_per_hour {
            if entry.hour_count() >= max_hour as usize {
                return Err(SecurityError::RateLimit {
                    agent_id: agent_id.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Record a successful operation for `agent_id` at time `now`. Callers
    /// must have just called [`Self::check`] successfully; `record` never
    /// rejects on its own.
    pub fn record(&self, agent_id: &AgentId, now: i64) {
        let mut entry = self.state.entry(agent_id.clone()).or_default();
        entry.record(now);
    }

    /// Reject `FILE_SIZE` if `size` exceeds `max_file_size`.
    pub fn guard_file_size(size: u64, max_file_size: u64) -> Result<()> {
        if size > max_file_size {
            return Err(OperationError::FileTooLarge {
                size,
                max: max_file_size,
            }
            .into());
        }
        Ok(())
    }

    /// Reject `BATCH_SIZE` if cumulative bytes exceed `max_batch_size`, or
    /// if `op_count` exceeds an optional cap on operation count.
    pub fn guard_batch(
        total_bytes: u64,
        op_count: usize,
        max_batch_size: u64,
        max_op_count: Option<usize>,
    ) -> Result<()> {
        if total_bytes > max_batch_size {
            return Err(OperationError::BatchTooLarge {
                size: total_bytes,
                max: max_batch_size,
            }
            .into());
        }
        if let Some(max_ops) = max_op_count {
            if op_count > max_ops {
                return Err(OperationError::BatchTooLarge {
                    size: op_count as u64,
                    max: max_ops as u64,
                }
                .into());
            }
        }
        Ok(())
    }
}
