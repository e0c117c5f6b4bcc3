//! Stable error categories shared by every boundary.
//!
//! Each error enum in the workspace maps onto one [`ErrorKind`] so callers of
//! the route-planning API receive a structured `{kind, message}` pair no
//! matter which layer failed.

use std::fmt;

/// Error category reported to route-planning callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Malformed coordinates or empty input.
    InvalidInput,
    /// The routing engine could not be reached or answered without a body.
    UpstreamUnavailable,
    /// The routing engine answered with an unexpected payload.
    UpstreamProtocol,
    /// The requested route does not exist.
    RouteNotFound,
    /// The route has no driver to attach a session to.
    NoDriverAssigned,
    /// The caller's driver is not the route's assigned driver.
    DriverMismatch,
    /// The route has no customers assigned.
    NoCustomersAssigned,
    /// The route has customers, but none are scheduled for the date.
    NoScheduleForDate,
    /// The requested session does not exist.
    SessionNotFound,
    /// The session has already been closed out.
    SessionAlreadyFinished,
    /// No deliveries were registered against the session.
    NoDeliveriesRegistered,
    /// The persistence store failed.
    Storage,
}

impl ErrorKind {
    /// Return the `snake_case` name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::UpstreamProtocol => "upstream_protocol",
            Self::RouteNotFound => "route_not_found",
            Self::NoDriverAssigned => "no_driver_assigned",
            Self::DriverMismatch => "driver_mismatch",
            Self::NoCustomersAssigned => "no_customers_assigned",
            Self::NoScheduleForDate => "no_schedule_for_date",
            Self::SessionNotFound => "session_not_found",
            Self::SessionAlreadyFinished => "session_already_finished",
            Self::NoDeliveriesRegistered => "no_deliveries_registered",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
