//! JSON rendering of command results and failures.

use std::io::Write;

use reparto_core::{Customer, DriverId, Location, RouteId};
use reparto_solver::RoutePlan;
use serde::Serialize;

use crate::CliError;

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Serialisable view of a [`RoutePlan`].
///
/// Geometry is embedded as JSON when the routing engine returned JSON and as
/// a string otherwise.
#[derive(Debug, Serialize)]
pub(crate) struct PlanOutput {
    pub(crate) route_id: RouteId,
    pub(crate) driver_id: DriverId,
    pub(crate) origin: Location,
    pub(crate) customers: Vec<Customer>,
    pub(crate) total_distance_meters: i64,
    pub(crate) geometry: Option<serde_json::Value>,
}

impl From<RoutePlan> for PlanOutput {
    fn from(plan: RoutePlan) -> Self {
        let geometry = plan.geometry.map(|raw| {
            serde_json::from_str(raw.as_str())
                .unwrap_or_else(|_| serde_json::Value::String(raw.into_inner()))
        });
        Self {
            route_id: plan.route_id,
            driver_id: plan.driver_id,
            origin: plan.origin,
            customers: plan.customers,
            total_distance_meters: plan.total_distance_meters,
            geometry,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    kind: &'a str,
    message: String,
}

/// Render a failure as a single-line `{"kind", "message"}` JSON object.
#[must_use]
pub fn error_report(err: &CliError) -> String {
    let report = ErrorReport {
        kind: err.kind().as_str(),
        message: err.to_string(),
    };
    serde_json::to_string(&report)
        .unwrap_or_else(|_| format!(r#"{{"kind":"{}","message":""}}"#, report.kind))
}
