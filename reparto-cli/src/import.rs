//! `import` command: seed the SQLite store from a JSON dataset.
//!
//! Rows are inserted in dependency order (customers and routes before the
//! assignments and schedules that reference them). Delivery records must
//! name sessions that already exist in the database.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use reparto_core::{
    Customer, DeliveryRecord, Route, RouteAssignment, ScheduledDelivery, SqliteStore,
    SqliteStoreError,
};
use reparto_fs::{open_utf8_file, prepare_database_path};
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::{
    ARG_DATASET, ARG_DB, CliError, DEFAULT_DB, ENV_IMPORT_DATASET, open_store, require_existing,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Load customers, routes, route assignments, scheduled \
                 deliveries and delivery records from a JSON dataset into \
                 the SQLite store, creating the database if needed.",
    about = "Import a JSON dataset into the store"
)]
#[ortho_config(prefix = "REPARTO")]
pub(crate) struct ImportArgs {
    /// Path to the JSON dataset.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// SQLite database to write; created when missing.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
}

/// Resolved `import` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) dataset: Utf8PathBuf,
    pub(crate) db: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let dataset = args.dataset.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_IMPORT_DATASET,
        })?;
        Ok(Self {
            dataset,
            db: args.db.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DB)),
        })
    }
}

/// Contents of an import file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Dataset {
    pub(crate) customers: Vec<Customer>,
    pub(crate) routes: Vec<Route>,
    pub(crate) assignments: Vec<RouteAssignment>,
    pub(crate) scheduled_deliveries: Vec<ScheduledDelivery>,
    pub(crate) delivery_records: Vec<DeliveryRecord>,
}

/// Row counts written by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct ImportSummary {
    pub(crate) customers: usize,
    pub(crate) routes: usize,
    pub(crate) assignments: usize,
    pub(crate) scheduled_deliveries: usize,
    pub(crate) delivery_records: usize,
}

pub(crate) fn run_import(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ImportConfig::try_from(merged)?;
    require_existing(&config.dataset, ARG_DATASET)?;

    let dataset = load_dataset(&config.dataset)?;
    prepare_database_path(&config.db).map_err(|source| CliError::PrepareDatabase {
        path: config.db.clone(),
        source,
    })?;
    let store = open_store(&config.db)?;
    let summary = import_dataset(&store, &dataset)?;
    log::info!(
        "imported {} customers and {} routes into {}",
        summary.customers,
        summary.routes,
        config.db
    );
    write_json(writer, &summary)
}

pub(crate) fn load_dataset(path: &Utf8Path) -> Result<Dataset, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenDataset {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseDataset {
        path: path.to_path_buf(),
        source,
    })
}

fn failed(entity: &'static str) -> impl Fn(SqliteStoreError) -> CliError {
    move |source| CliError::ImportRows { entity, source }
}

pub(crate) fn import_dataset(
    store: &SqliteStore,
    dataset: &Dataset,
) -> Result<ImportSummary, CliError> {
    for customer in &dataset.customers {
        store.insert_customer(customer).map_err(failed("customers"))?;
    }
    for route in &dataset.routes {
        store.insert_route(route).map_err(failed("routes"))?;
    }
    for assignment in &dataset.assignments {
        store
            .insert_assignment(assignment)
            .map_err(failed("assignments"))?;
    }
    for delivery in &dataset.scheduled_deliveries {
        store
            .insert_scheduled_delivery(delivery)
            .map_err(failed("scheduled deliveries"))?;
    }
    for record in &dataset.delivery_records {
        store
            .insert_delivery_record(record)
            .map_err(failed("delivery records"))?;
    }

    Ok(ImportSummary {
        customers: dataset.customers.len(),
        routes: dataset.routes.len(),
        assignments: dataset.assignments.len(),
        scheduled_deliveries: dataset.scheduled_deliveries.len(),
        delivery_records: dataset.delivery_records.len(),
    })
}
