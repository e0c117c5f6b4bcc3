//! Behavioural tests for `RoutePlanner` using rstest-bdd.

use std::cell::RefCell;

use reparto_core::test_support::{FixedMatrixProvider, MemoryStore};
use reparto_core::{
    Customer, CustomerId, DistanceMatrix, DistanceMatrixProvider, DriverId,
    HaversineDistanceProvider, Location, Route, RouteId, RoutingError, UNREACHABLE,
};
use reparto_solver::{GreedyRouteOptimizer, PlanError, RoutePlan, RoutePlanner};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const ROUTE: RouteId = RouteId(3);

#[derive(Debug, Default)]
enum Distances {
    #[default]
    StraightLine,
    Unreachable,
    Fixed(FixedMatrixProvider),
}

impl DistanceMatrixProvider for Distances {
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        match self {
            Self::StraightLine => HaversineDistanceProvider.build_matrix(locations),
            Self::Unreachable => Err(RoutingError::NetworkError {
                url: "http://127.0.0.1:9/table/v1/driving".to_owned(),
                message: "connection refused".to_owned(),
            }),
            Self::Fixed(provider) => provider.build_matrix(locations),
        }
    }
}

#[derive(Debug, Default)]
struct PlannerWorld {
    store: MemoryStore,
    distances: RefCell<Distances>,
    outcome: RefCell<Option<Result<RoutePlan, PlanError>>>,
}

impl PlannerWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<RoutePlan, PlanError> {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
    }
}

#[fixture]
fn world() -> PlannerWorld {
    PlannerWorld::default()
}

#[given("a route assigned to driver {driver:u64} with three customers along a street")]
fn given_assigned_route(world: &PlannerWorld, driver: u64) {
    let depot = Location::new(-34.6037, -58.3816);
    world
        .store
        .add_route(Route::new(ROUTE, "microcentro", depot).with_driver(DriverId(driver)));
    for (id, offset) in [(1_u64, 0.003), (2, 0.001), (3, 0.002)] {
        #[expect(clippy::float_arithmetic, reason = "coordinate offset")]
        let location = Location::new(depot.latitude, depot.longitude + offset);
        world
            .store
            .add_customer(Customer::new(CustomerId(id), format!("cliente {id}"), location));
        world.store.assign(ROUTE, CustomerId(id), 1);
    }
}

#[given("a route without a driver")]
fn given_unassigned_route(world: &PlannerWorld) {
    world
        .store
        .add_route(Route::new(ROUTE, "sin chofer", Location::new(-34.6, -58.4)));
    world
        .store
        .add_customer(Customer::new(CustomerId(1), "cliente 1", Location::new(-34.6, -58.39)));
    world.store.assign(ROUTE, CustomerId(1), 1);
}

#[given("straight-line distances")]
fn given_straight_line(world: &PlannerWorld) {
    world.distances.replace(Distances::StraightLine);
}

#[given("a routing engine that cannot be reached")]
fn given_unreachable_engine(world: &PlannerWorld) {
    world.distances.replace(Distances::Unreachable);
}

#[given("a distance matrix where no customer is reachable")]
fn given_cut_off_matrix(world: &PlannerWorld) {
    let mut matrix = vec![vec![UNREACHABLE; 4]; 4];
    for (index, row) in matrix.iter_mut().enumerate() {
        if let Some(cell) = row.get_mut(index) {
            *cell = 0;
        }
    }
    world
        .distances
        .replace(Distances::Fixed(FixedMatrixProvider::with_matrix(matrix)));
}

#[when("driver {driver:u64} asks for the optimised route")]
fn when_driver_plans(world: &PlannerWorld, driver: u64) {
    let distances = world.distances.replace(Distances::default());
    let planner = RoutePlanner::new(
        &world.store,
        GreedyRouteOptimizer::new(distances),
        HaversineDistanceProvider,
    );
    let outcome = planner.optimize_route(ROUTE, DriverId(driver));
    world.outcome.replace(Some(outcome));
}

#[then("the customers are visited in the order 2, 3, 1")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_visiting_order(world: &PlannerWorld) {
    let plan = world.expect_outcome().expect("expected a plan");
    let ids: Vec<u64> = plan.customers.iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert!(plan.total_distance_meters > 0);
}

#[then("the plan includes the closed-loop geometry")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_geometry(world: &PlannerWorld) {
    let plan = world.expect_outcome().expect("expected a plan");
    let geometry = plan.geometry.expect("non-empty plans carry geometry");
    let depot = format!("[{},{}]", plan.origin.longitude, plan.origin.latitude);
    assert!(geometry.as_str().contains(&format!("[{depot}")));
    assert!(geometry.as_str().ends_with(&format!("{depot}]}}")));
}

#[then("planning fails with kind {kind:word}")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_fails_with(world: &PlannerWorld, kind: String) {
    let err = world.expect_outcome().expect_err("expected planning to fail");
    assert_eq!(err.kind().as_str(), kind.trim_matches('"'));
}

#[then("the plan is empty without geometry")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_empty_plan(world: &PlannerWorld) {
    let plan = world.expect_outcome().expect("expected a plan");
    assert!(plan.customers.is_empty());
    assert_eq!(plan.total_distance_meters, 0);
    assert!(plan.geometry.is_none());
}

#[scenario(path = "tests/features/route_planner.feature", index = 0)]
fn nearest_first(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planner.feature", index = 1)]
fn other_driver(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planner.feature", index = 2)]
fn no_driver(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planner.feature", index = 3)]
fn unreachable_engine(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_planner.feature", index = 4)]
fn cut_off_customers(world: PlannerWorld) {
    let _ = world;
}
