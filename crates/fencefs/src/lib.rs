//! `fencefs` — the thin CLI transport over the `fencefs-core` kernel.
//!
//! Parses the twelve sandboxed filesystem operations (plus administrative
//! subcommands) from the command line, reads each operation's JSON request
//! from stdin, and dispatches it to the appropriate handler.

/// Command-line interface module: parsing, dispatch, and handlers.
pub mod cli;

/// JSON request/response types and the stdin reader.
pub mod io;

pub use cli::{AdminAction, Cli, Commands};
