//! Core domain types for the Reparto delivery engine.
//!
//! The crate models a single driver's delivery run: the depot and customers
//! to visit, the routing-engine boundary used to measure distances between
//! them, the optimiser contract that orders the visits, and the delivery
//! session state machine that reconciles planned, delivered and returned
//! quantities at the end of the day.
//!
//! Persistence and routing engines are reached through traits so callers can
//! plug in SQLite, HTTP or in-memory implementations.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod customer;
pub mod error;
pub mod ids;
pub mod location;
pub mod optimizer;
pub mod route;
pub mod routing;
pub mod schedule;
pub mod session;
pub mod store;

#[doc(hidden)]
pub mod test_support;

pub use customer::Customer;
pub use error::ErrorKind;
pub use ids::{CustomerId, DriverId, RouteId, SessionId};
pub use location::{Location, LocationError};
pub use optimizer::{OptimizedRoute, RouteOptimizer};
pub use route::{Route, RouteAssignment};
pub use routing::{
    DistanceMatrix, DistanceMatrixProvider, GeometryProvider, HaversineDistanceProvider,
    RawGeometry, RoutingError, UNREACHABLE,
};
pub use schedule::{DeliveryState, ScheduledDelivery};
pub use session::{
    DeliveryRecord, DeliverySession, DeliverySessions, NewDeliverySession, Quantities,
    Reconciliation, SessionError, SessionState,
};
pub use store::{
    CustomerDirectory, DeliveryRecordStore, RouteStore, ScheduleStore, SessionStore, StoreError,
};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteStore, SqliteStoreError};
