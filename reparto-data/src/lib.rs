//! Routing-engine adapters for the Reparto delivery engine.
//!
//! Responsibilities:
//! - Implement the routing traits from `reparto-core` over HTTP.
//! - Decode routing-engine payloads into core types.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `reparto-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod routing;

pub use routing::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRoutingProvider, HttpRoutingProviderConfig,
    ProviderBuildError,
};
