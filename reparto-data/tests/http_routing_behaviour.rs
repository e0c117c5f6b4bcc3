//! Behavioural tests for [`HttpRoutingProvider`] against a local canned server.

mod support;

use std::cell::RefCell;
use std::time::Duration;

use reparto_core::{
    Customer, CustomerId, DistanceMatrix, DistanceMatrixProvider, ErrorKind, GeometryProvider,
    Location, RawGeometry, RoutingError,
};
use reparto_data::{HttpRoutingProvider, HttpRoutingProviderConfig};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{CannedServer, closed_port_url};

const GEOMETRY: &str = r#"{"code":"Ok","routes":[{"geometry":{"type":"LineString","coordinates":[[-58.4,-34.6],[-58.5,-34.7]]},"distance":1520.4}]}"#;

/// Shared state for HTTP routing scenarios.
#[derive(Debug, Default)]
struct RoutingWorld {
    server: RefCell<Option<CannedServer>>,
    base_url: RefCell<String>,
    timeout: RefCell<Option<Duration>>,
    matrix: RefCell<Option<Result<DistanceMatrix, RoutingError>>>,
    geometry: RefCell<Option<Result<RawGeometry, RoutingError>>>,
}

impl RoutingWorld {
    fn serve(&self, server: CannedServer) {
        self.base_url.replace(server.base_url().to_owned());
        self.server.replace(Some(server));
    }

    fn provider(&self) -> HttpRoutingProvider {
        let mut config = HttpRoutingProviderConfig::new(self.base_url.borrow().clone());
        if let Some(timeout) = *self.timeout.borrow() {
            config = config.with_timeout(timeout);
        }
        HttpRoutingProvider::with_config(config).expect("provider should build")
    }

    fn request_line(&self) -> String {
        self.server
            .borrow()
            .as_ref()
            .expect("a server was started")
            .request_line()
    }

    fn matrix_error(&self) -> RoutingError {
        self.matrix
            .borrow()
            .clone()
            .expect("a matrix request was made")
            .expect_err("the request should fail")
    }
}

#[fixture]
fn world() -> RoutingWorld {
    RoutingWorld::default()
}

fn two_locations() -> Vec<Location> {
    vec![Location::new(-34.6, -58.4), Location::new(-34.7, -58.5)]
}

// --- Given steps ---

#[given("a routing service returning a 2x2 distance table")]
fn service_ok(world: &RoutingWorld) {
    world.serve(CannedServer::respond(
        200,
        r#"{"code":"Ok","distances":[[0.0,1520.4],[1498.6,0.0]]}"#,
    ));
}

#[given("a routing service returning an empty body")]
fn service_empty(world: &RoutingWorld) {
    world.serve(CannedServer::respond(200, ""));
}

#[given("a routing service returning a table without distances")]
fn service_without_distances(world: &RoutingWorld) {
    world.serve(CannedServer::respond(200, r#"{"code":"Ok","durations":[[0.0]]}"#));
}

#[given("a routing service failing with status 500")]
fn service_500(world: &RoutingWorld) {
    world.serve(CannedServer::respond(500, r#"{"code":"Error"}"#));
}

#[given("a routing service that is not listening")]
fn service_down(world: &RoutingWorld) {
    world.base_url.replace(closed_port_url());
}

#[given("a routing service that never answers")]
fn service_stalled(world: &RoutingWorld) {
    world.timeout.replace(Some(Duration::from_millis(300)));
    world.serve(CannedServer::stall(Duration::from_secs(2)));
}

#[given("a routing service returning route geometry")]
fn service_geometry(world: &RoutingWorld) {
    world.serve(CannedServer::respond(200, GEOMETRY));
}

// --- When steps ---

#[when("I request distances for two locations")]
fn request_distances(world: &RoutingWorld) {
    let result = world.provider().build_matrix(&two_locations());
    world.matrix.replace(Some(result));
}

#[when("I request the polyline for a depot and two customers")]
fn request_polyline(world: &RoutingWorld) {
    let customers = vec![
        Customer::new(CustomerId(1), "a", Location::new(-34.7, -58.5)),
        Customer::new(CustomerId(2), "b", Location::new(-34.8, -58.6)),
    ];
    let result = world
        .provider()
        .build_polyline(Location::new(-34.6, -58.4), &customers);
    world.geometry.replace(Some(result));
}

// --- Then steps ---

#[then("a 2x2 matrix of whole metres is returned")]
fn then_matrix(world: &RoutingWorld) {
    let matrix = world
        .matrix
        .borrow()
        .clone()
        .expect("a matrix request was made")
        .expect("the request should succeed");
    assert_eq!(matrix, vec![vec![0, 1520], vec![1499, 0]]);
}

#[then("the table service was called with longitude-first coordinates")]
fn then_table_path(world: &RoutingWorld) {
    assert_eq!(
        world.request_line(),
        "GET /table/v1/driving/-58.4,-34.6;-58.5,-34.7?annotations=distance HTTP/1.1"
    );
}

#[then("the error kind is upstream unavailable")]
fn then_unavailable(world: &RoutingWorld) {
    let err = world.matrix_error();
    assert!(matches!(err, RoutingError::EmptyResponse { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[then("the error kind is upstream protocol")]
fn then_protocol(world: &RoutingWorld) {
    let err = world.matrix_error();
    assert_eq!(err, RoutingError::MissingField { field: "distances" });
    assert_eq!(err.kind(), ErrorKind::UpstreamProtocol);
}

#[then("an HTTP 500 error is returned")]
fn then_http_500(world: &RoutingWorld) {
    let err = world.matrix_error();
    assert!(
        matches!(err, RoutingError::HttpError { status: 500, .. }),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[then("a network error is returned")]
fn then_network(world: &RoutingWorld) {
    let err = world.matrix_error();
    assert!(matches!(err, RoutingError::NetworkError { .. }), "{err:?}");
}

#[then("a timeout error is returned")]
fn then_timeout(world: &RoutingWorld) {
    let err = world.matrix_error();
    assert!(matches!(err, RoutingError::Timeout { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[then("the geometry body is returned unchanged")]
fn then_geometry(world: &RoutingWorld) {
    let geometry = world
        .geometry
        .borrow()
        .clone()
        .expect("a geometry request was made")
        .expect("the request should succeed");
    assert_eq!(geometry.as_str(), GEOMETRY);
}

#[then("the route service was called with a closed loop")]
fn then_route_path(world: &RoutingWorld) {
    assert_eq!(
        world.request_line(),
        "GET /route/v1/driving/-58.4,-34.6;-58.5,-34.7;-58.6,-34.8;-58.4,-34.6\
         ?overview=full&geometries=geojson HTTP/1.1"
    );
}

#[scenario(path = "tests/features/http_routing.feature", index = 0)]
fn distances_returned(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/http_routing.feature", index = 1)]
fn empty_body(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/http_routing.feature", index = 2)]
fn missing_distances(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/http_routing.feature", index = 3)]
fn server_error(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/http_routing.feature", index = 4)]
fn unreachable_service(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/http_routing.feature", index = 5)]
fn stalled_service(world: RoutingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/http_routing.feature", index = 6)]
fn geometry_passed_through(world: RoutingWorld) {
    let _ = world;
}
