//! Junkyard CLI library
//!
//! The `junkyard` binary is a thin wrapper around these modules; command
//! handlers and their reports are public so they can be exercised in tests.
//!
//! # Module Structure
//!
//! - [`cli`]: clap argument definitions
//! - [`commands`]: one handler per subcommand
//! - [`state`]: config loading and storage-backed [`state::AppState`]
//! - [`output`]: text/JSON rendering
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: `CliError` and exit codes

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod state;
