//! Greedy route optimisation for Reparto.
//!
//! [`GreedyRouteOptimizer`] is the default
//! [`RouteOptimizer`](reparto_core::RouteOptimizer): it asks a
//! [`DistanceMatrixProvider`](reparto_core::DistanceMatrixProvider) for the
//! depot-and-customers matrix and grows a single tour from the depot, always
//! taking the cheapest arc to an unvisited customer.
//!
//! [`RoutePlanner`] wraps the optimiser with the route lookups and guards a
//! driver-facing `optimize_route` request needs, and renders the resulting
//! loop through a [`GeometryProvider`](reparto_core::GeometryProvider).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod greedy;
mod optimizer;
mod planner;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use optimizer::GreedyRouteOptimizer;
pub use planner::{PlanError, RoutePlan, RoutePlanner};
