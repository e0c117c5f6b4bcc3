use crate::{Customer, Location, RoutingError};

/// Customers in visiting order together with the tour length.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedRoute {
    /// Customers in the order the vehicle visits them. Empty when no
    /// feasible tour exists.
    pub customers: Vec<Customer>,
    /// Depot to first customer, every leg, and the return to the depot.
    pub total_distance_meters: i64,
}

impl OptimizedRoute {
    /// A route visiting nobody.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            customers: Vec::new(),
            total_distance_meters: 0,
        }
    }

    /// Whether the optimiser produced no visits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// Order a set of customers into a single-vehicle tour from a depot.
///
/// Implementations must either return every input customer exactly once or
/// an empty route; a partially ordered result is never valid. Routing-engine
/// failures propagate unchanged. Optimisers must be `Send + Sync` so one
/// instance can serve concurrent requests.
pub trait RouteOptimizer: Send + Sync {
    /// Compute the visiting order for `customers` leaving from `origin`.
    fn optimize(
        &self,
        origin: Location,
        customers: &[Customer],
    ) -> Result<OptimizedRoute, RoutingError>;
}
