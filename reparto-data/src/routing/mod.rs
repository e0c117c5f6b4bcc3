//! HTTP routing providers backed by an OSRM-compatible service.
//!
//! [`HttpRoutingProvider`] implements both
//! [`reparto_core::DistanceMatrixProvider`] (via the Table API) and
//! [`reparto_core::GeometryProvider`] (via the Route API). The core traits
//! are synchronous; the provider blocks on async HTTP calls internally so the
//! engine stays embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use reparto_core::{DistanceMatrixProvider, Location};
//! use reparto_data::routing::{HttpRoutingProvider, HttpRoutingProviderConfig};
//! use std::time::Duration;
//!
//! let config = HttpRoutingProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_profile("driving");
//! let provider = HttpRoutingProvider::with_config(config)?;
//!
//! let matrix = provider.build_matrix(&[
//!     Location::new(-34.60, -58.38),
//!     Location::new(-34.61, -58.40),
//! ])?;
//! println!("depot to first stop: {} m", matrix[0][1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRoutingProvider, HttpRoutingProviderConfig,
    ProviderBuildError,
};
