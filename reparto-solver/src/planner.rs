//! Route planning: load a route, order its customers, render the loop.

use log::{info, warn};
use reparto_core::store::{CustomerDirectory, RouteStore, StoreError};
use reparto_core::{
    Customer, DriverId, ErrorKind, GeometryProvider, Location, RawGeometry, RouteId,
    RouteOptimizer, RoutingError,
};
use thiserror::Error;

/// Errors from [`RoutePlanner::optimize_route`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The route does not exist.
    #[error("route {route_id} not found")]
    RouteNotFound {
        /// Requested route.
        route_id: RouteId,
    },
    /// The route has no driver.
    #[error("route {route_id} has no driver assigned")]
    NoDriverAssigned {
        /// Requested route.
        route_id: RouteId,
    },
    /// The caller is not the route's driver.
    #[error("route {route_id} is assigned to driver {assigned}, not {requested}")]
    DriverMismatch {
        /// Requested route.
        route_id: RouteId,
        /// Driver assigned to the route.
        assigned: DriverId,
        /// Driver named in the request.
        requested: DriverId,
    },
    /// The route has no customers.
    #[error("route {route_id} has no customers assigned")]
    NoCustomersAssigned {
        /// Requested route.
        route_id: RouteId,
    },
    /// Measuring or rendering the route failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),
    /// The persistence store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlanError {
    /// Map the error onto its caller-facing category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RouteNotFound { .. } => ErrorKind::RouteNotFound,
            Self::NoDriverAssigned { .. } => ErrorKind::NoDriverAssigned,
            Self::DriverMismatch { .. } => ErrorKind::DriverMismatch,
            Self::NoCustomersAssigned { .. } => ErrorKind::NoCustomersAssigned,
            Self::Routing(err) => err.kind(),
            Self::Store(err) => err.kind(),
        }
    }
}

/// Optimised visiting order of a route, with its rendered geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Planned route.
    pub route_id: RouteId,
    /// Driver the plan was produced for.
    pub driver_id: DriverId,
    /// Depot the tour starts and ends at.
    pub origin: Location,
    /// Customers in visiting order; empty when no feasible tour exists.
    pub customers: Vec<Customer>,
    /// Closed-tour length in metres.
    pub total_distance_meters: i64,
    /// Routing-engine geometry of the closed loop, absent for an empty plan.
    pub geometry: Option<RawGeometry>,
}

/// Answers `optimize_route` requests from route-planning callers.
#[derive(Debug, Clone)]
pub struct RoutePlanner<S, O, G> {
    store: S,
    optimizer: O,
    geometry: G,
}

impl<S, O, G> RoutePlanner<S, O, G>
where
    S: RouteStore + CustomerDirectory,
    O: RouteOptimizer,
    G: GeometryProvider,
{
    /// Construct a planner from its collaborators.
    pub const fn new(store: S, optimizer: O, geometry: G) -> Self {
        Self {
            store,
            optimizer,
            geometry,
        }
    }

    /// Order the customers of `route_id` for `driver_id` and render the tour.
    ///
    /// Customers are handed to the optimiser in assignment order.
    ///
    /// # Errors
    ///
    /// [`PlanError::RouteNotFound`], [`PlanError::NoDriverAssigned`],
    /// [`PlanError::DriverMismatch`] and [`PlanError::NoCustomersAssigned`]
    /// guard the request in that order; routing and store failures propagate.
    pub fn optimize_route(
        &self,
        route_id: RouteId,
        driver_id: DriverId,
    ) -> Result<RoutePlan, PlanError> {
        let route = self
            .store
            .route(route_id)?
            .ok_or(PlanError::RouteNotFound { route_id })?;
        let assigned = route
            .driver_id
            .ok_or(PlanError::NoDriverAssigned { route_id })?;
        if assigned != driver_id {
            return Err(PlanError::DriverMismatch {
                route_id,
                assigned,
                requested: driver_id,
            });
        }

        let ids: Vec<_> = self
            .store
            .assignments(route_id)?
            .into_iter()
            .map(|assignment| assignment.customer_id)
            .collect();
        if ids.is_empty() {
            return Err(PlanError::NoCustomersAssigned { route_id });
        }
        let customers = self.store.customers_by_ids(&ids)?;
        if customers.len() != ids.len() {
            warn!(
                "route {route_id}: {} of {} assigned customers missing from the directory",
                ids.len().saturating_sub(customers.len()),
                ids.len()
            );
        }

        let optimized = self.optimizer.optimize(route.origin, &customers)?;
        let geometry = if optimized.is_empty() {
            None
        } else {
            Some(
                self.geometry
                    .build_polyline(route.origin, &optimized.customers)?,
            )
        };

        info!(
            "planned route {route_id} for driver {driver_id}: {} stops, {} m",
            optimized.customers.len(),
            optimized.total_distance_meters
        );
        Ok(RoutePlan {
            route_id,
            driver_id,
            origin: route.origin,
            customers: optimized.customers,
            total_distance_meters: optimized.total_distance_meters,
            geometry,
        })
    }
}
