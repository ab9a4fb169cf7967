//! CLI module for leaflog
//!
//! Provides the command-line interface for:
//! - serve: run the HTTP server
//! - metrics: one-shot metrics report
//! - show: one-shot record lookup
//! - list: one-shot page listing

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{resolve_config, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_json_to};
