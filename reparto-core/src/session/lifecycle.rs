use jiff::{Timestamp, civil::Date};
use log::{info, warn};

use crate::store::{DeliveryRecordStore, RouteStore, ScheduleStore, SessionStore, StoreError};
use crate::{
    DeliverySession, DriverId, NewDeliverySession, Quantities, Reconciliation, RouteId, SessionId,
};

use super::error::SessionError;

/// Start and finish delivery sessions against a store.
///
/// Operations are synchronous and keep no state between calls. Uniqueness of
/// `(driver, date)` is enforced by the store; the lookup in
/// [`start_session`](Self::start_session) only avoids a redundant write.
///
/// # Examples
/// ```
/// use jiff::civil::date;
/// use reparto_core::test_support::MemoryStore;
/// use reparto_core::{DeliverySessions, DriverId, Location, Route, RouteId};
///
/// let store = MemoryStore::default();
/// store.add_route(Route::new(RouteId(1), "norte", Location::new(0.0, 0.0)).with_driver(DriverId(3)));
/// store.assign(RouteId(1), reparto_core::CustomerId(10), 1);
/// store.schedule(RouteId(1), reparto_core::CustomerId(10), date(2024, 5, 2), Some(4), None);
///
/// let sessions = DeliverySessions::new(&store);
/// let first = sessions.start_session(RouteId(1), date(2024, 5, 2))?;
/// let second = sessions.start_session(RouteId(1), date(2024, 5, 2))?;
/// assert_eq!(first, second);
/// # Ok::<(), reparto_core::SessionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeliverySessions<S> {
    store: S,
}

impl<S> DeliverySessions<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S> DeliverySessions<S>
where
    S: RouteStore + ScheduleStore + SessionStore + DeliveryRecordStore,
{
    /// Open the session for the route's driver on `date`.
    ///
    /// Returns the existing session id when one was already started.
    ///
    /// # Errors
    ///
    /// Guards run in order: [`SessionError::RouteNotFound`],
    /// [`SessionError::NoDriverAssigned`], [`SessionError::NoCustomersAssigned`],
    /// then [`SessionError::NoScheduleForDate`]. Store failures surface as
    /// [`SessionError::Store`], except a failed idempotency lookup, which is
    /// logged and treated as "no session yet".
    pub fn start_session(&self, route_id: RouteId, date: Date) -> Result<SessionId, SessionError> {
        let route = self
            .store
            .route(route_id)?
            .ok_or(SessionError::RouteNotFound { route_id })?;
        let driver_id = route
            .driver_id
            .ok_or(SessionError::NoDriverAssigned { route_id })?;

        if let Some(existing) = self.existing_session(driver_id, date) {
            info!(
                "session {} already started for driver {driver_id} on {date}",
                existing.id
            );
            return Ok(existing.id);
        }

        if self.store.assignments(route_id)?.is_empty() {
            return Err(SessionError::NoCustomersAssigned { route_id });
        }

        let scheduled = self.store.scheduled_deliveries(route_id, date)?;
        if scheduled.is_empty() {
            return Err(SessionError::NoScheduleForDate { route_id, date });
        }

        let new_session = NewDeliverySession {
            driver_id,
            date,
            planned: Quantities::planned(&scheduled),
        };
        match self.store.create_session(&new_session) {
            Ok(id) => {
                info!(
                    "started session {id} for driver {driver_id} on {date} with planned {}/{}",
                    new_session.planned.regular, new_session.planned.special
                );
                Ok(id)
            }
            Err(err @ StoreError::DuplicateSession { .. }) => {
                // A concurrent start won the race; hand back its session.
                warn!("{err}; returning the stored session");
                self.store
                    .find_session(driver_id, date)?
                    .map(|session| session.id)
                    .ok_or(SessionError::Store(err))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn existing_session(&self, driver_id: DriverId, date: Date) -> Option<DeliverySession> {
        match self.store.find_session(driver_id, date) {
            Ok(found) => found,
            Err(err) => {
                warn!("session lookup for driver {driver_id} on {date} failed, creating: {err}");
                None
            }
        }
    }

    /// Close the session now. See [`finish_session_at`](Self::finish_session_at).
    ///
    /// # Errors
    ///
    /// As for [`finish_session_at`](Self::finish_session_at).
    pub fn finish_session(&self, session_id: SessionId) -> Result<Reconciliation, SessionError> {
        self.finish_session_at(session_id, Timestamp::now())
    }

    /// Close the session, reconciling planned against delivered quantities.
    ///
    /// Returned quantities are `planned - delivered` per product, clamped at
    /// zero when more was delivered than planned.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionNotFound`], [`SessionError::SessionAlreadyFinished`]
    /// for a session with a return timestamp, [`SessionError::NoDeliveriesRegistered`]
    /// when no delivery records exist, or [`SessionError::Store`].
    pub fn finish_session_at(
        &self,
        session_id: SessionId,
        returned_at: Timestamp,
    ) -> Result<Reconciliation, SessionError> {
        let session = self
            .store
            .session(session_id)?
            .ok_or(SessionError::SessionNotFound { session_id })?;
        if let Some(finished_at) = session.return_timestamp {
            return Err(SessionError::SessionAlreadyFinished {
                session_id,
                finished_at,
            });
        }

        let records = self.store.delivery_records(session_id)?;
        if records.is_empty() {
            return Err(SessionError::NoDeliveriesRegistered { session_id });
        }

        let delivered = Quantities::delivered(&records);
        let returned = session.planned.saturating_sub(delivered);
        if delivered.regular > session.planned.regular {
            warn!(
                "session {session_id}: delivered {} regular units against {} planned",
                delivered.regular, session.planned.regular
            );
        }
        if delivered.special > session.planned.special {
            warn!(
                "session {session_id}: delivered {} special units against {} planned",
                delivered.special, session.planned.special
            );
        }

        match self.store.record_return(session_id, returned, returned_at) {
            Ok(()) => {}
            Err(StoreError::SessionFinished { finished_at, .. }) => {
                // Another caller closed the session after it was read.
                return Err(SessionError::SessionAlreadyFinished {
                    session_id,
                    finished_at,
                });
            }
            Err(err) => return Err(err.into()),
        }
        info!(
            "finished session {session_id}: returned {}/{}",
            returned.regular, returned.special
        );
        Ok(Reconciliation {
            session_id,
            planned: session.planned,
            delivered,
            returned,
            returned_at,
        })
    }
}
