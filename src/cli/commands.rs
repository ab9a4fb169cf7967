//! CLI command implementations
//!
//! Boot sequence: parse args -> load config -> apply flag overrides ->
//! install logging -> dispatch.

use tracing::info;

use crate::api::ApiHandler;
use crate::http_server::HttpServer;
use crate::observability::{init_logging, Event};
use crate::storage::CsvRecordStore;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = resolve_config(&cli)?;

    init_logging(&config.log_level, config.log_format()?);
    info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"), "starting leaflog");
    info!(
        event = %Event::ConfigLoaded,
        dataset = %config.dataset_path.display(),
        "configuration loaded"
    );

    run_command(cli.command, config)
}

/// Loads the config file and applies command-line overrides
pub fn resolve_config(cli: &Cli) -> CliResult<Config> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;

    if let Some(ref dataset) = cli.dataset {
        config.dataset_path = dataset.clone();
    }
    if let Command::Serve { port: Some(port) } = cli.command {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}

/// Dispatch a parsed command
pub fn run_command(command: Command, config: Config) -> CliResult<()> {
    let handler = ApiHandler::new(CsvRecordStore::new(&config.dataset_path));

    match command {
        Command::Serve { .. } => serve(config, handler),
        Command::Metrics => write_json(&handler.metrics()?),
        Command::Show { id } => write_json(&handler.get(&id)?),
        Command::List { page, per_page } => {
            let page = page.to_string();
            let per_page = per_page.to_string();
            write_json(&handler.list(Some(&page), Some(&per_page))?)
        }
    }
}

/// Runs the HTTP server on a single-threaded runtime.
///
/// Handlers are synchronous, so requests are processed one at a time.
fn serve(config: Config, handler: ApiHandler<CsvRecordStore>) -> CliResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::server_failed(format!("Failed to build runtime: {}", e)))?;

    let server = HttpServer::new(config.server, handler);
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::server_failed(e.to_string()))
}
