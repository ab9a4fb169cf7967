//! CLI argument definitions using clap
//!
//! Commands:
//! - leaflog serve [--port <port>]
//! - leaflog metrics
//! - leaflog show <id>
//! - leaflog list [--page <n>] [--per-page <n>]
//!
//! `--config` and `--dataset` are accepted by every command.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// leaflog - logbook and metrics for leaf-disease image analysis
#[derive(Parser, Debug)]
#[command(name = "leaflog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to JSON configuration file
    #[arg(long, env = "LEAFLOG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Dataset file, overriding the configured path
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port to listen on, overriding the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print metrics for the dataset and exit
    Metrics,

    /// Print one record and exit
    Show {
        /// Record identifier (nsu)
        id: String,
    },

    /// Print one page of records and exit
    List {
        /// 1-based page number
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Records per page
        #[arg(long = "per-page", default_value_t = 10, allow_negative_numbers = true)]
        per_page: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
