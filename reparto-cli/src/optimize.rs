//! `optimize` command: order a route's customers for its driver.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use reparto_core::{DriverId, HaversineDistanceProvider, RouteId};
use reparto_data::{HttpRoutingProvider, HttpRoutingProviderConfig};
use reparto_solver::{GreedyRouteOptimizer, RoutePlan, RoutePlanner};
use serde::{Deserialize, Serialize};

use crate::output::{PlanOutput, write_json};
use crate::{
    ARG_DB, ARG_DISTANCES, ARG_DRIVER, ARG_OSRM_BASE_URL, ARG_PROFILE, ARG_ROUTE,
    ARG_TIMEOUT_SECS, CliError, DEFAULT_DB, ENV_OPTIMIZE_DRIVER, ENV_OPTIMIZE_ROUTE, open_store,
    require_existing,
};

/// Where distances and geometry come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DistanceSource {
    /// Query the configured OSRM service.
    #[default]
    Osrm,
    /// Straight-line distances, no network access.
    Haversine,
}

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "optimize",
    long_about = "Order the customers assigned to a route, starting and ending \
                 at the route's depot, and print the plan with its road \
                 geometry. Settings can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Compute the visiting order for a driver's route"
)]
#[ortho_config(prefix = "REPARTO")]
pub(crate) struct OptimizeArgs {
    /// Route to plan.
    #[arg(long = ARG_ROUTE, value_name = "id")]
    #[serde(default)]
    pub(crate) route: Option<u64>,
    /// Driver requesting the plan; must be the route's assigned driver.
    #[arg(long = ARG_DRIVER, value_name = "id")]
    #[serde(default)]
    pub(crate) driver: Option<u64>,
    /// SQLite database holding routes and customers.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
    /// Distance source (`osrm` or `haversine`).
    #[arg(long = ARG_DISTANCES, value_enum, value_name = "source")]
    #[serde(default)]
    pub(crate) distances: Option<DistanceSource>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM profile, e.g. "driving".
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Per-request timeout for OSRM calls.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptimizeConfig {
    pub(crate) route_id: RouteId,
    pub(crate) driver_id: DriverId,
    pub(crate) db: Utf8PathBuf,
    pub(crate) distances: DistanceSource,
    pub(crate) osrm_base_url: String,
    pub(crate) profile: String,
    pub(crate) timeout: Duration,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.db, ARG_DB)
    }

    fn routing_config(&self) -> HttpRoutingProviderConfig {
        HttpRoutingProviderConfig::new(self.osrm_base_url.clone())
            .with_profile(self.profile.clone())
            .with_timeout(self.timeout)
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let route = args.route.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE,
            env: ENV_OPTIMIZE_ROUTE,
        })?;
        let driver = args.driver.ok_or(CliError::MissingArgument {
            field: ARG_DRIVER,
            env: ENV_OPTIMIZE_DRIVER,
        })?;

        let defaults = HttpRoutingProviderConfig::default();
        Ok(Self {
            route_id: RouteId(route),
            driver_id: DriverId(driver),
            db: args.db.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DB)),
            distances: args.distances.unwrap_or_default(),
            osrm_base_url: args.osrm_base_url.unwrap_or(defaults.base_url),
            profile: args.profile.unwrap_or(defaults.profile),
            timeout: args
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        })
    }
}

pub(crate) fn run_optimize(args: OptimizeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let plan = plan_route(&config)?;
    write_json(writer, &PlanOutput::from(plan))
}

fn plan_route(config: &OptimizeConfig) -> Result<RoutePlan, CliError> {
    let store = open_store(&config.db)?;
    let plan = match config.distances {
        DistanceSource::Haversine => RoutePlanner::new(
            &store,
            GreedyRouteOptimizer::new(HaversineDistanceProvider),
            HaversineDistanceProvider,
        )
        .optimize_route(config.route_id, config.driver_id)?,
        DistanceSource::Osrm => {
            let provider = HttpRoutingProvider::with_config(config.routing_config()).map_err(
                |source| CliError::BuildRoutingProvider {
                    base_url: config.osrm_base_url.clone(),
                    source,
                },
            )?;
            RoutePlanner::new(&store, GreedyRouteOptimizer::new(&provider), &provider)
                .optimize_route(config.route_id, config.driver_id)?
        }
    };
    log::info!(
        "route {} ordered into {} stops",
        plan.route_id,
        plan.customers.len()
    );
    Ok(plan)
}
