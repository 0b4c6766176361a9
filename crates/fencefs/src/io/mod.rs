//! JSON request/response processing for the `fencefs` CLI transport.
//!
//! Handles stdin/stdout communication for all twelve filesystem operations
//! plus the admin subcommand.

pub mod messages;
pub mod processor;

pub use messages::{FenceRequest, FenceResponse};
pub use processor::{StdinLimits, StdinProcessor};
