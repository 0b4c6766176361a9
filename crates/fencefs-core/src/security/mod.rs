//! Security support that sits alongside the path-vetting pipeline:
//! per-agent rate limiting (§5).

pub mod rate_limiter;

pub use rate_limiter::RateLimiter;
