#![expect(
    clippy::expect_used,
    reason = "regression tests use expect for readable failures"
)]

//! Golden route regression tests for the greedy optimiser.
//!
//! Each case loads a small instance from JSON, feeds its distance matrix to
//! the optimiser through a fixed provider, and checks the visiting order and
//! tour length exactly. `null` matrix cells stand for unreachable pairs.

use std::fs;
use std::path::PathBuf;

use reparto_core::test_support::FixedMatrixProvider;
use reparto_core::{Customer, CustomerId, Location, RouteOptimizer, UNREACHABLE};
use reparto_solver::GreedyRouteOptimizer;
use rstest::rstest;
use serde::Deserialize;

/// Deserialised golden route case.
#[derive(Debug, Deserialize)]
struct GoldenRoute {
    name: String,
    #[expect(dead_code, reason = "kept for documentation in JSON files")]
    description: String,
    depot: LocationSpec,
    customers: Vec<CustomerSpec>,
    distance_matrix_meters: Vec<Vec<Option<i64>>>,
    expected: ExpectedRoute,
}

#[derive(Debug, Deserialize)]
struct LocationSpec {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct CustomerSpec {
    id: u64,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ExpectedRoute {
    order: Vec<u64>,
    total_distance_meters: i64,
}

fn load_golden_route(filename: &str) -> GoldenRoute {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden_routes/data")
        .join(filename);
    let content = fs::read_to_string(&path).expect("failed to read golden route file");
    serde_json::from_str(&content).expect("failed to parse golden route JSON")
}

fn build_customers(specs: &[CustomerSpec]) -> Vec<Customer> {
    specs
        .iter()
        .map(|entry| {
            Customer::new(
                CustomerId(entry.id),
                format!("golden-{}", entry.id),
                Location::new(entry.latitude, entry.longitude),
            )
        })
        .collect()
}

fn build_matrix(cells: Vec<Vec<Option<i64>>>) -> Vec<Vec<i64>> {
    cells
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.unwrap_or(UNREACHABLE))
                .collect()
        })
        .collect()
}

#[rstest]
#[case("single_customer.json")]
#[case("line_four_customers.json")]
#[case("equal_distances.json")]
#[case("one_way_streets.json")]
#[case("unreachable_customer.json")]
fn golden_route_regression(#[case] filename: &str) {
    let golden = load_golden_route(filename);
    let customers = build_customers(&golden.customers);
    let depot = Location::new(golden.depot.latitude, golden.depot.longitude);
    let provider = FixedMatrixProvider::with_matrix(build_matrix(golden.distance_matrix_meters));
    let optimizer = GreedyRouteOptimizer::new(provider);

    let route = optimizer
        .optimize(depot, &customers)
        .expect("golden route should optimise");

    let actual: Vec<u64> = route.customers.iter().map(|c| c.id.get()).collect();
    assert_eq!(
        actual, golden.expected.order,
        "{}: visiting order mismatch",
        golden.name
    );
    assert_eq!(
        route.total_distance_meters, golden.expected.total_distance_meters,
        "{}: tour length mismatch",
        golden.name
    );
    assert_eq!(
        optimizer.provider().calls(),
        1,
        "{}: the matrix is requested once",
        golden.name
    );
}
