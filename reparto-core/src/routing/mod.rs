//! Measure and render paths through delivery locations.
//!
//! The [`DistanceMatrixProvider`] trait abstracts the retrieval of pairwise
//! driving distances between [`Location`](crate::Location) values, and
//! [`GeometryProvider`] fetches renderable road geometry for an ordered path.
//! Both are implemented over HTTP by `reparto-data`; this module ships the
//! offline [`HaversineDistanceProvider`].
//!
//! Errors are returned when inputs are invalid, e.g. an empty slice, and when
//! the routing engine is unreachable or answers with an unexpected payload.

mod error;
mod haversine;
mod provider;

pub use error::RoutingError;
pub use haversine::HaversineDistanceProvider;
pub use provider::{
    DistanceMatrix, DistanceMatrixProvider, GeometryProvider, RawGeometry, UNREACHABLE,
    closed_loop, ensure_square, validate_locations,
};
