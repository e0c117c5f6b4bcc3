//! `GreedyRouteOptimizer`: cheapest-arc-first ordering over provider distances.

use log::{debug, warn};
use reparto_core::routing::ensure_square;
use reparto_core::{
    Customer, DistanceMatrixProvider, Location, OptimizedRoute, RouteOptimizer, RoutingError,
};

use crate::greedy::{cheapest_arc_tour, tour_length, visiting_order};

/// Single-vehicle optimiser that builds one greedy tour and stops.
///
/// There is no improvement phase, so results are deterministic for a given
/// matrix and usually within a few percent of a local-search solution for
/// urban delivery runs.
///
/// # Examples
/// ```
/// use reparto_core::test_support::UnitDistanceProvider;
/// use reparto_core::{Customer, CustomerId, Location, RouteOptimizer};
/// use reparto_solver::GreedyRouteOptimizer;
///
/// let optimizer = GreedyRouteOptimizer::new(UnitDistanceProvider);
/// let customers = vec![
///     Customer::new(CustomerId(7), "a", Location::new(0.0, 0.1)),
///     Customer::new(CustomerId(8), "b", Location::new(0.0, 0.2)),
/// ];
/// let route = optimizer.optimize(Location::new(0.0, 0.0), &customers)?;
/// assert_eq!(route.customers.len(), 2);
/// assert_eq!(route.total_distance_meters, 3);
/// # Ok::<(), reparto_core::RoutingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GreedyRouteOptimizer<T> {
    provider: T,
}

impl<T> GreedyRouteOptimizer<T>
where
    T: DistanceMatrixProvider,
{
    /// Construct an optimiser measuring distances with `provider`.
    pub const fn new(provider: T) -> Self {
        Self { provider }
    }

    /// Borrow the distance provider.
    pub const fn provider(&self) -> &T {
        &self.provider
    }
}

impl<T> RouteOptimizer for GreedyRouteOptimizer<T>
where
    T: DistanceMatrixProvider + Send + Sync,
{
    fn optimize(
        &self,
        origin: Location,
        customers: &[Customer],
    ) -> Result<OptimizedRoute, RoutingError> {
        if customers.is_empty() {
            return Ok(OptimizedRoute::empty());
        }

        let mut nodes = Vec::with_capacity(customers.len() + 1);
        nodes.push(origin);
        nodes.extend(customers.iter().map(|customer| customer.location));

        let matrix = self.provider.build_matrix(&nodes)?;
        if let Err(err) = ensure_square(&matrix, nodes.len()) {
            warn!("discarding distance matrix: {err}");
            return Ok(OptimizedRoute::empty());
        }

        let Some(successors) = cheapest_arc_tour(&matrix) else {
            warn!(
                "no feasible tour through {} customers; returning an empty route",
                customers.len()
            );
            return Ok(OptimizedRoute::empty());
        };

        let order = visiting_order(&successors);
        let ordered: Vec<Customer> = order
            .iter()
            .filter_map(|&node| node.checked_sub(1).and_then(|index| customers.get(index)))
            .cloned()
            .collect();
        if ordered.len() != customers.len() {
            warn!(
                "tour visited {} of {} customers; returning an empty route",
                ordered.len(),
                customers.len()
            );
            return Ok(OptimizedRoute::empty());
        }

        let total_distance_meters = tour_length(&matrix, &order);
        debug!(
            "ordered {} customers, tour length {total_distance_meters} m",
            ordered.len()
        );
        Ok(OptimizedRoute {
            customers: ordered,
            total_distance_meters,
        })
    }
}
