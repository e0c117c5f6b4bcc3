//! Persistence boundary for routes, schedules and sessions.
//!
//! Each trait covers one table family so callers can depend on the narrowest
//! capability they need. [`SqliteStore`] implements all of them; tests use
//! the in-memory double in [`crate::test_support`].

use jiff::{Timestamp, civil::Date};
use thiserror::Error;

use crate::{
    Customer, CustomerId, DeliveryRecord, DeliverySession, DriverId, ErrorKind,
    NewDeliverySession, Quantities, Route, RouteAssignment, RouteId, ScheduledDelivery, SessionId,
};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteStore, SqliteStoreError};

/// Errors raised by persistence backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A session already exists for the driver and date.
    #[error("a session for driver {driver_id} on {date} already exists")]
    DuplicateSession {
        /// Driver of the conflicting session.
        driver_id: DriverId,
        /// Date of the conflicting session.
        date: Date,
    },
    /// The session already carries a return timestamp.
    #[error("session {session_id} already finished at {finished_at}")]
    SessionFinished {
        /// Session that was already closed.
        session_id: SessionId,
        /// Return time stored by the earlier finish.
        finished_at: Timestamp,
    },
    /// A row the caller expected to update is missing.
    #[error("{entity} {id} does not exist")]
    Missing {
        /// Table or entity name.
        entity: &'static str,
        /// Identifier that was looked up.
        id: u64,
    },
    /// The backend failed.
    #[error("storage backend error: {message}")]
    Backend {
        /// Backend error description.
        message: String,
    },
}

impl StoreError {
    /// Wrap a backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Every store failure is reported as [`ErrorKind::Storage`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}

/// Read access to customer master data.
pub trait CustomerDirectory {
    /// Fetch the customers with the given ids, in the order requested.
    ///
    /// Unknown ids are skipped.
    fn customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, StoreError>;

    /// Every known customer, ordered by id.
    fn all_customers(&self) -> Result<Vec<Customer>, StoreError>;
}

/// Read access to routes and their customer assignments.
pub trait RouteStore {
    /// Look a route up by id.
    fn route(&self, id: RouteId) -> Result<Option<Route>, StoreError>;

    /// Assignments for `route_id`, ordered by `order` then customer id.
    fn assignments(&self, route_id: RouteId) -> Result<Vec<RouteAssignment>, StoreError>;
}

/// Read access to the delivery schedule.
pub trait ScheduleStore {
    /// Scheduled deliveries for a route on a date.
    fn scheduled_deliveries(
        &self,
        route_id: RouteId,
        date: Date,
    ) -> Result<Vec<ScheduledDelivery>, StoreError>;
}

/// Read and write access to delivery sessions.
pub trait SessionStore {
    /// Look a session up by id.
    fn session(&self, id: SessionId) -> Result<Option<DeliverySession>, StoreError>;

    /// The session for a driver on a date, if one was started.
    fn find_session(
        &self,
        driver_id: DriverId,
        date: Date,
    ) -> Result<Option<DeliverySession>, StoreError>;

    /// Persist a new session and return its id.
    ///
    /// Must fail with [`StoreError::DuplicateSession`] when a session for the
    /// same `(driver, date)` already exists.
    fn create_session(&self, session: &NewDeliverySession) -> Result<SessionId, StoreError>;

    /// Record returned quantities and the return time.
    ///
    /// Must fail with [`StoreError::SessionFinished`], leaving the stored
    /// values untouched, when the session already has a return timestamp.
    fn record_return(
        &self,
        id: SessionId,
        returned: Quantities,
        at: Timestamp,
    ) -> Result<(), StoreError>;
}

/// Read access to delivery records.
pub trait DeliveryRecordStore {
    /// Every delivery recorded against a session.
    fn delivery_records(&self, session_id: SessionId) -> Result<Vec<DeliveryRecord>, StoreError>;
}

impl<T: CustomerDirectory + ?Sized> CustomerDirectory for &T {
    fn customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, StoreError> {
        (**self).customers_by_ids(ids)
    }

    fn all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        (**self).all_customers()
    }
}

impl<T: RouteStore + ?Sized> RouteStore for &T {
    fn route(&self, id: RouteId) -> Result<Option<Route>, StoreError> {
        (**self).route(id)
    }

    fn assignments(&self, route_id: RouteId) -> Result<Vec<RouteAssignment>, StoreError> {
        (**self).assignments(route_id)
    }
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for &T {
    fn scheduled_deliveries(
        &self,
        route_id: RouteId,
        date: Date,
    ) -> Result<Vec<ScheduledDelivery>, StoreError> {
        (**self).scheduled_deliveries(route_id, date)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn session(&self, id: SessionId) -> Result<Option<DeliverySession>, StoreError> {
        (**self).session(id)
    }

    fn find_session(
        &self,
        driver_id: DriverId,
        date: Date,
    ) -> Result<Option<DeliverySession>, StoreError> {
        (**self).find_session(driver_id, date)
    }

    fn create_session(&self, session: &NewDeliverySession) -> Result<SessionId, StoreError> {
        (**self).create_session(session)
    }

    fn record_return(
        &self,
        id: SessionId,
        returned: Quantities,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        (**self).record_return(id, returned, at)
    }
}

impl<T: DeliveryRecordStore + ?Sized> DeliveryRecordStore for &T {
    fn delivery_records(&self, session_id: SessionId) -> Result<Vec<DeliveryRecord>, StoreError> {
        (**self).delivery_records(session_id)
    }
}
