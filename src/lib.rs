//! Facade crate for the Reparto delivery engine.
//!
//! This crate re-exports the core domain types and session lifecycle, and
//! exposes the greedy optimiser, the OSRM routing provider and the SQLite
//! store behind feature flags.

#![forbid(unsafe_code)]

pub use reparto_core::{
    Customer, CustomerDirectory, CustomerId, DeliveryRecord, DeliveryRecordStore, DeliverySession,
    DeliverySessions, DeliveryState, DistanceMatrix, DistanceMatrixProvider, DriverId, ErrorKind,
    GeometryProvider, HaversineDistanceProvider, Location, OptimizedRoute, Quantities, RawGeometry,
    Reconciliation, Route, RouteAssignment, RouteId, RouteOptimizer, RouteStore, RoutingError,
    ScheduleStore, ScheduledDelivery, SessionError, SessionId, SessionState, SessionStore,
    StoreError, UNREACHABLE,
};

#[cfg(feature = "store-sqlite")]
pub use reparto_core::{SqliteStore, SqliteStoreError};

#[cfg(feature = "solver-greedy")]
pub use reparto_solver::{GreedyRouteOptimizer, PlanError, RoutePlan, RoutePlanner};

#[cfg(feature = "routing-http")]
pub use reparto_data::{HttpRoutingProvider, HttpRoutingProviderConfig, ProviderBuildError};
