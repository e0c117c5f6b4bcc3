//! `start-session` and `finish-session` commands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use jiff::{Zoned, civil::Date};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use reparto_core::{DeliverySessions, RouteId, SessionId};
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::{
    ARG_DATE, ARG_DB, ARG_ROUTE, ARG_SESSION, CliError, DEFAULT_DB, ENV_FINISH_SESSION_SESSION,
    ENV_START_SESSION_ROUTE, open_store, require_existing,
};

/// CLI arguments for the `start-session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "start-session",
    long_about = "Open the delivery session for the driver assigned to a \
                 route. Starting again on the same day returns the existing \
                 session.",
    about = "Start a driver's delivery session"
)]
#[ortho_config(prefix = "REPARTO")]
pub(crate) struct StartSessionArgs {
    /// Route being delivered.
    #[arg(long = ARG_ROUTE, value_name = "id")]
    #[serde(default)]
    pub(crate) route: Option<u64>,
    /// Delivery date (YYYY-MM-DD); defaults to today in the local time zone.
    #[arg(long = ARG_DATE, value_name = "date")]
    #[serde(default)]
    pub(crate) date: Option<Date>,
    /// SQLite database holding routes and sessions.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
}

/// Resolved `start-session` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartSessionConfig {
    pub(crate) route_id: RouteId,
    pub(crate) date: Date,
    pub(crate) db: Utf8PathBuf,
}

impl TryFrom<StartSessionArgs> for StartSessionConfig {
    type Error = CliError;

    fn try_from(args: StartSessionArgs) -> Result<Self, Self::Error> {
        let route = args.route.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE,
            env: ENV_START_SESSION_ROUTE,
        })?;
        Ok(Self {
            route_id: RouteId(route),
            date: args.date.unwrap_or_else(|| Zoned::now().date()),
            db: args.db.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DB)),
        })
    }
}

/// CLI arguments for the `finish-session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "finish-session",
    long_about = "Close a delivery session: compare planned and delivered \
                 quantities, record what came back to the depot, and print \
                 the reconciliation.",
    about = "Finish a delivery session"
)]
#[ortho_config(prefix = "REPARTO")]
pub(crate) struct FinishSessionArgs {
    /// Session to close.
    #[arg(long = ARG_SESSION, value_name = "id")]
    #[serde(default)]
    pub(crate) session: Option<u64>,
    /// SQLite database holding sessions and delivery records.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
}

/// Resolved `finish-session` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FinishSessionConfig {
    pub(crate) session_id: SessionId,
    pub(crate) db: Utf8PathBuf,
}

impl TryFrom<FinishSessionArgs> for FinishSessionConfig {
    type Error = CliError;

    fn try_from(args: FinishSessionArgs) -> Result<Self, Self::Error> {
        let session = args.session.ok_or(CliError::MissingArgument {
            field: ARG_SESSION,
            env: ENV_FINISH_SESSION_SESSION,
        })?;
        Ok(Self {
            session_id: SessionId(session),
            db: args.db.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DB)),
        })
    }
}

#[derive(Debug, Serialize)]
struct StartedSession {
    session_id: SessionId,
    route_id: RouteId,
    date: Date,
}

pub(crate) fn run_start_session(
    args: StartSessionArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = StartSessionConfig::try_from(merged)?;
    require_existing(&config.db, ARG_DB)?;

    let store = open_store(&config.db)?;
    let session_id = DeliverySessions::new(&store).start_session(config.route_id, config.date)?;
    write_json(
        writer,
        &StartedSession {
            session_id,
            route_id: config.route_id,
            date: config.date,
        },
    )
}

pub(crate) fn run_finish_session(
    args: FinishSessionArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = FinishSessionConfig::try_from(merged)?;
    require_existing(&config.db, ARG_DB)?;

    let store = open_store(&config.db)?;
    let reconciliation = DeliverySessions::new(&store).finish_session(config.session_id)?;
    write_json(writer, &reconciliation)
}
