use jiff::{Timestamp, civil::Date};
use thiserror::Error;

use crate::{ErrorKind, RouteId, SessionId, StoreError};

/// Errors from starting or finishing a delivery session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
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
    /// The route has no customers.
    #[error("route {route_id} has no customers assigned")]
    NoCustomersAssigned {
        /// Requested route.
        route_id: RouteId,
    },
    /// Nothing is scheduled for the route on the date.
    #[error("route {route_id} has no deliveries scheduled for {date}")]
    NoScheduleForDate {
        /// Requested route.
        route_id: RouteId,
        /// Requested date.
        date: Date,
    },
    /// The session does not exist.
    #[error("session {session_id} not found")]
    SessionNotFound {
        /// Requested session.
        session_id: SessionId,
    },
    /// The session was already closed out.
    #[error("session {session_id} already finished at {finished_at}")]
    SessionAlreadyFinished {
        /// Requested session.
        session_id: SessionId,
        /// Recorded return time.
        finished_at: Timestamp,
    },
    /// No deliveries were recorded against the session.
    #[error("session {session_id} has no registered deliveries")]
    NoDeliveriesRegistered {
        /// Requested session.
        session_id: SessionId,
    },
    /// The persistence store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Map the error onto its caller-facing category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RouteNotFound { .. } => ErrorKind::RouteNotFound,
            Self::NoDriverAssigned { .. } => ErrorKind::NoDriverAssigned,
            Self::NoCustomersAssigned { .. } => ErrorKind::NoCustomersAssigned,
            Self::NoScheduleForDate { .. } => ErrorKind::NoScheduleForDate,
            Self::SessionNotFound { .. } => ErrorKind::SessionNotFound,
            Self::SessionAlreadyFinished { .. } => ErrorKind::SessionAlreadyFinished,
            Self::NoDeliveriesRegistered { .. } => ErrorKind::NoDeliveriesRegistered,
            Self::Store(_) => ErrorKind::Storage,
        }
    }
}
