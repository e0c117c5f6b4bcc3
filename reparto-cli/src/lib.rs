//! Command-line interface for Reparto route planning and delivery sessions.
//!
//! Every subcommand prints a single JSON document on success. Failures are
//! reported by the binary as `{"kind": ..., "message": ...}`.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use reparto_core::SqliteStore;

mod error;
mod import;
mod optimize;
mod output;
mod session;

pub use error::CliError;
pub use output::error_report;

use import::ImportArgs;
use optimize::OptimizeArgs;
use session::{FinishSessionArgs, StartSessionArgs};

const ARG_DB: &str = "db";
const ARG_ROUTE: &str = "route";
const ARG_DRIVER: &str = "driver";
const ARG_DATE: &str = "date";
const ARG_SESSION: &str = "session";
const ARG_DATASET: &str = "dataset";
const ARG_DISTANCES: &str = "distances";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_PROFILE: &str = "profile";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";

const ENV_OPTIMIZE_ROUTE: &str = "REPARTO_CMDS_OPTIMIZE_ROUTE";
const ENV_OPTIMIZE_DRIVER: &str = "REPARTO_CMDS_OPTIMIZE_DRIVER";
const ENV_START_SESSION_ROUTE: &str = "REPARTO_CMDS_START_SESSION_ROUTE";
const ENV_FINISH_SESSION_SESSION: &str = "REPARTO_CMDS_FINISH_SESSION_SESSION";
const ENV_IMPORT_DATASET: &str = "REPARTO_CMDS_IMPORT_DATASET";

/// Database used when `--db` is not configured.
const DEFAULT_DB: &str = "reparto.db";

/// Run the Reparto CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Optimize(args) => optimize::run_optimize(args, writer),
        Command::StartSession(args) => session::run_start_session(args, writer),
        Command::FinishSession(args) => session::run_finish_session(args, writer),
        Command::Import(args) => import::run_import(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "reparto",
    about = "Plan delivery routes and run a driver's delivery sessions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order a route's customers for its driver.
    Optimize(OptimizeArgs),
    /// Open the delivery session for a route's driver on a date.
    StartSession(StartSessionArgs),
    /// Close a delivery session and reconcile returned stock.
    FinishSession(FinishSessionArgs),
    /// Load customers, routes and schedules from a JSON dataset.
    Import(ImportArgs),
}

/// Check that an input file exists before anything opens it.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match reparto_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn open_store(path: &Utf8Path) -> Result<SqliteStore, CliError> {
    log::debug!("opening store at {path}");
    SqliteStore::open(path.as_std_path()).map_err(|source| CliError::OpenStore {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests;
