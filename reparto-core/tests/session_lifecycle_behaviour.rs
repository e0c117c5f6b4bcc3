//! Behavioural tests for `DeliverySessions` using rstest-bdd.

use std::cell::RefCell;

use jiff::{Timestamp, civil::Date, civil::date};
use reparto_core::{
    CustomerId, DeliverySessions, DriverId, ErrorKind, Location, Quantities, Reconciliation,
    Route, RouteId, SessionError, SessionId, SessionState, SessionStore,
    test_support::MemoryStore,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const ROUTE: RouteId = RouteId(11);
const DRIVER: DriverId = DriverId(4);

fn day() -> Date {
    date(2024, 3, 1)
}

/// Shared state for session scenarios.
#[derive(Debug, Default)]
struct SessionWorld {
    store: MemoryStore,
    starts: RefCell<Vec<Result<SessionId, SessionError>>>,
    finish: RefCell<Option<Result<Reconciliation, SessionError>>>,
}

impl SessionWorld {
    fn sessions(&self) -> DeliverySessions<&MemoryStore> {
        DeliverySessions::new(&self.store)
    }

    fn started_id(&self) -> SessionId {
        let starts = self.starts.borrow();
        let first = starts.first().expect("a start was attempted");
        *first.as_ref().expect("the start succeeded")
    }

    fn start_error_kind(&self) -> ErrorKind {
        let starts = self.starts.borrow();
        let last = starts.last().expect("a start was attempted");
        last.as_ref().expect_err("the start failed").kind()
    }

    fn add_route(&self) {
        self.store
            .add_route(Route::new(ROUTE, "centro", Location::new(-34.6, -58.4)).with_driver(DRIVER));
    }

    fn assign_customers(&self) {
        self.store.assign(ROUTE, CustomerId(1), 1);
        self.store.assign(ROUTE, CustomerId(2), 2);
    }

    fn schedule_day(&self) {
        self.store
            .schedule(ROUTE, CustomerId(1), day(), Some(60), Some(30));
        self.store
            .schedule(ROUTE, CustomerId(2), day(), Some(40), Some(20));
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::default()
}

#[given("a route with a driver, two customers and a schedule for the day")]
fn given_scheduled_route(world: &SessionWorld) {
    world.add_route();
    world.assign_customers();
    world.schedule_day();
}

#[given("a route with a driver and two customers but no schedule")]
fn given_unscheduled_route(world: &SessionWorld) {
    world.add_route();
    world.assign_customers();
}

#[given("a route with a driver, no customers and a schedule for the day")]
fn given_empty_route(world: &SessionWorld) {
    world.add_route();
    world.schedule_day();
}

#[given("session lookups are failing")]
fn given_failing_lookups(world: &SessionWorld) {
    world.store.fail_session_lookups(true);
}

#[when("the session is started")]
fn when_started(world: &SessionWorld) {
    let result = world.sessions().start_session(ROUTE, day());
    world.starts.borrow_mut().push(result);
}

#[when("the session is started again")]
fn when_started_again(world: &SessionWorld) {
    when_started(world);
}

#[when("deliveries totalling 80 regular and 60 special units are registered")]
fn when_deliveries_registered(world: &SessionWorld) {
    let id = world.started_id();
    world
        .store
        .record_delivery(id, CustomerId(1), Some(50), Some(60));
    world.store.record_delivery(id, CustomerId(2), Some(30), None);
}

#[when("the session is finished")]
fn when_finished(world: &SessionWorld) {
    let id = world.started_id();
    let result = world.sessions().finish_session_at(id, Timestamp::UNIX_EPOCH);
    world.finish.replace(Some(result));
}

#[then("both starts return the same session id")]
fn then_same_id(world: &SessionWorld) {
    let starts = world.starts.borrow();
    assert_eq!(starts.len(), 2);
    assert_eq!(starts[0], starts[1]);
}

#[then("exactly one session is persisted")]
fn then_one_session(world: &SessionWorld) {
    assert_eq!(world.store.session_count(), 1);
}

#[then("the returned quantities are 20 regular and 0 special units")]
fn then_returned(world: &SessionWorld) {
    let finish = world.finish.borrow();
    let reconciliation = finish
        .as_ref()
        .expect("finish was attempted")
        .as_ref()
        .expect("finish succeeded");
    assert_eq!(reconciliation.planned, Quantities::new(100, 50));
    assert_eq!(reconciliation.delivered, Quantities::new(80, 60));
    assert_eq!(reconciliation.returned, Quantities::new(20, 0));
}

#[then("the session is marked as finished")]
fn then_finished(world: &SessionWorld) {
    let session = world
        .store
        .session(world.started_id())
        .expect("store query")
        .expect("session exists");
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.returned, Quantities::new(20, 0));
}

#[then("starting fails with a no schedule for date error")]
fn then_no_schedule(world: &SessionWorld) {
    assert_eq!(world.start_error_kind(), ErrorKind::NoScheduleForDate);
}

#[then("starting fails with a no customers assigned error")]
fn then_no_customers(world: &SessionWorld) {
    assert_eq!(world.start_error_kind(), ErrorKind::NoCustomersAssigned);
}

#[then("the schedule was never read")]
fn then_schedule_untouched(world: &SessionWorld) {
    assert_eq!(world.store.schedule_lookup_count(), 0);
}

#[then("finishing fails with a no deliveries registered error")]
fn then_no_deliveries(world: &SessionWorld) {
    let finish = world.finish.borrow();
    let err = finish
        .as_ref()
        .expect("finish was attempted")
        .as_ref()
        .expect_err("finish failed");
    assert_eq!(err.kind(), ErrorKind::NoDeliveriesRegistered);
}

#[scenario(path = "tests/features/session_lifecycle.feature", index = 0)]
fn start_is_idempotent(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session_lifecycle.feature", index = 1)]
fn finish_reconciles(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session_lifecycle.feature", index = 2)]
fn missing_schedule_rejected(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session_lifecycle.feature", index = 3)]
fn empty_route_rejected(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session_lifecycle.feature", index = 4)]
fn finish_without_deliveries_rejected(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session_lifecycle.feature", index = 5)]
fn failed_lookup_still_starts(world: SessionWorld) {
    let _ = world;
}
