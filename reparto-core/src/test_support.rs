//! In-memory store and deterministic providers used by unit and behaviour
//! tests across the workspace.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};

use jiff::{Timestamp, civil::Date};

use crate::store::{
    CustomerDirectory, DeliveryRecordStore, RouteStore, ScheduleStore, SessionStore, StoreError,
};
use crate::{
    Customer, CustomerId, DeliveryRecord, DeliverySession, DeliveryState, DistanceMatrix,
    DistanceMatrixProvider, DriverId, Location, NewDeliverySession, Quantities, Route,
    RouteAssignment, RouteId, RoutingError, ScheduledDelivery, SessionId,
};

/// In-memory implementation of every store trait.
///
/// Rows live in vectors and are scanned linearly; intended only for small
/// fixtures. The `(driver, date)` uniqueness rule is enforced on insert.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RefCell<Vec<Customer>>,
    routes: RefCell<Vec<Route>>,
    assignments: RefCell<Vec<RouteAssignment>>,
    schedule: RefCell<Vec<ScheduledDelivery>>,
    sessions: RefCell<Vec<DeliverySession>>,
    records: RefCell<Vec<DeliveryRecord>>,
    fail_lookups: Cell<bool>,
    hide_next_lookup: Cell<bool>,
    stale_next_read: Cell<bool>,
    schedule_lookups: Cell<usize>,
}

impl MemoryStore {
    /// Add a customer.
    pub fn add_customer(&self, customer: Customer) {
        self.customers.borrow_mut().push(customer);
    }

    /// Add a route.
    pub fn add_route(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }

    /// Assign a customer to a route.
    pub fn assign(&self, route_id: RouteId, customer_id: CustomerId, order: u32) {
        self.assignments
            .borrow_mut()
            .push(RouteAssignment::new(route_id, customer_id, order));
    }

    /// Schedule a delivery for a customer on a date.
    pub fn schedule(
        &self,
        route_id: RouteId,
        customer_id: CustomerId,
        date: Date,
        regular: Option<u32>,
        special: Option<u32>,
    ) {
        self.schedule.borrow_mut().push(ScheduledDelivery {
            route_id,
            customer_id,
            date,
            planned_regular_qty: regular,
            planned_special_qty: special,
            product_name: "pan".into(),
            state: DeliveryState::Scheduled,
        });
    }

    /// Record a delivery against a session.
    pub fn record_delivery(
        &self,
        session_id: SessionId,
        customer_id: CustomerId,
        regular: Option<u32>,
        special: Option<u32>,
    ) {
        self.records.borrow_mut().push(DeliveryRecord {
            session_id,
            customer_id,
            regular_qty_delivered: regular,
            special_qty_delivered: special,
        });
    }

    /// Make every `find_session` call fail with a backend error.
    pub fn fail_session_lookups(&self, fail: bool) {
        self.fail_lookups.set(fail);
    }

    /// Make the next `find_session` call report no session, simulating a
    /// concurrent start that has not become visible yet.
    pub fn hide_sessions_from_next_lookup(&self) {
        self.hide_next_lookup.set(true);
    }

    /// Make the next `session` call report the session as unfinished,
    /// simulating a finish by another caller after the read.
    pub fn serve_stale_session_on_next_read(&self) {
        self.stale_next_read.set(true);
    }

    /// Number of `scheduled_deliveries` calls made so far.
    pub fn schedule_lookup_count(&self) -> usize {
        self.schedule_lookups.get()
    }

    /// Number of persisted sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.borrow().len()
    }
}

impl CustomerDirectory for MemoryStore {
    fn customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, StoreError> {
        let customers = self.customers.borrow();
        Ok(ids
            .iter()
            .filter_map(|id| customers.iter().find(|c| c.id == *id).cloned())
            .collect())
    }

    fn all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let mut customers = self.customers.borrow().clone();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }
}

impl RouteStore for MemoryStore {
    fn route(&self, id: RouteId) -> Result<Option<Route>, StoreError> {
        Ok(self.routes.borrow().iter().find(|r| r.id == id).cloned())
    }

    fn assignments(&self, route_id: RouteId) -> Result<Vec<RouteAssignment>, StoreError> {
        let mut found: Vec<_> = self
            .assignments
            .borrow()
            .iter()
            .filter(|a| a.route_id == route_id)
            .copied()
            .collect();
        found.sort_by_key(|a| (a.order, a.customer_id));
        Ok(found)
    }
}

impl ScheduleStore for MemoryStore {
    fn scheduled_deliveries(
        &self,
        route_id: RouteId,
        date: Date,
    ) -> Result<Vec<ScheduledDelivery>, StoreError> {
        self.schedule_lookups.set(self.schedule_lookups.get() + 1);
        Ok(self
            .schedule
            .borrow()
            .iter()
            .filter(|s| s.route_id == route_id && s.date == date)
            .cloned()
            .collect())
    }
}

impl SessionStore for MemoryStore {
    fn session(&self, id: SessionId) -> Result<Option<DeliverySession>, StoreError> {
        let found = self.sessions.borrow().iter().find(|s| s.id == id).cloned();
        if self.stale_next_read.replace(false) {
            return Ok(found.map(|session| DeliverySession {
                returned: Quantities::default(),
                return_timestamp: None,
                ..session
            }));
        }
        Ok(found)
    }

    fn find_session(
        &self,
        driver_id: DriverId,
        date: Date,
    ) -> Result<Option<DeliverySession>, StoreError> {
        if self.fail_lookups.get() {
            return Err(StoreError::backend("session lookup unavailable"));
        }
        if self.hide_next_lookup.replace(false) {
            return Ok(None);
        }
        Ok(self
            .sessions
            .borrow()
            .iter()
            .find(|s| s.driver_id == driver_id && s.date == date)
            .cloned())
    }

    fn create_session(&self, session: &NewDeliverySession) -> Result<SessionId, StoreError> {
        let mut sessions = self.sessions.borrow_mut();
        if sessions
            .iter()
            .any(|s| s.driver_id == session.driver_id && s.date == session.date)
        {
            return Err(StoreError::DuplicateSession {
                driver_id: session.driver_id,
                date: session.date,
            });
        }
        let id = SessionId(sessions.len() as u64 + 1);
        sessions.push(DeliverySession {
            id,
            driver_id: session.driver_id,
            date: session.date,
            planned: session.planned,
            returned: Quantities::default(),
            return_timestamp: None,
        });
        Ok(id)
    }

    fn record_return(
        &self,
        id: SessionId,
        returned: Quantities,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.borrow_mut();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::Missing {
                entity: "session",
                id: id.get(),
            })?;
        if let Some(finished_at) = session.return_timestamp {
            return Err(StoreError::SessionFinished {
                session_id: id,
                finished_at,
            });
        }
        session.returned = returned;
        session.return_timestamp = Some(at);
        Ok(())
    }
}

impl DeliveryRecordStore for MemoryStore {
    fn delivery_records(&self, session_id: SessionId) -> Result<Vec<DeliveryRecord>, StoreError> {
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|r| r.session_id == session_id)
            .copied()
            .collect())
    }
}

/// Deterministic provider returning one-metre edges and zero on the diagonal.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitDistanceProvider;

impl DistanceMatrixProvider for UnitDistanceProvider {
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        if locations.is_empty() {
            return Err(RoutingError::EmptyInput);
        }
        let n = locations.len();
        Ok((0..n)
            .map(|i| (0..n).map(|j| i64::from(i != j)).collect())
            .collect())
    }
}

/// Provider that answers every request with a canned result and counts calls.
#[derive(Debug)]
pub struct FixedMatrixProvider {
    response: Result<DistanceMatrix, RoutingError>,
    calls: AtomicUsize,
}

impl FixedMatrixProvider {
    /// Always return `matrix`, whatever the input.
    pub fn with_matrix(matrix: DistanceMatrix) -> Self {
        Self {
            response: Ok(matrix),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with `error`.
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `build_matrix` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DistanceMatrixProvider for FixedMatrixProvider {
    fn build_matrix(&self, _locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
