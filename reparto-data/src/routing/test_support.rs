//! Test utilities for routing providers.
//!
//! [`StubRoutingProvider`] returns pre-configured responses without making
//! HTTP requests.

use reparto_core::{
    DistanceMatrix, DistanceMatrixProvider, GeometryProvider, Location, RawGeometry, RoutingError,
};

/// Stub routing provider for testing.
///
/// # Example
///
/// ```
/// use reparto_core::{DistanceMatrixProvider, Location};
/// use reparto_data::routing::test_support::StubRoutingProvider;
///
/// let provider = StubRoutingProvider::with_matrix(vec![vec![0, 60], vec![60, 0]]);
/// let locations = [Location::new(0.0, 0.0), Location::new(1.0, 1.0)];
///
/// assert!(provider.build_matrix(&locations).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StubRoutingProvider {
    response: StubResponse,
    geometry: RawGeometry,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Matrix(DistanceMatrix),
    Error(RoutingError),
}

const STUB_GEOMETRY: &str = r#"{"routes":[{"geometry":{"type":"LineString","coordinates":[]}}]}"#;

impl StubRoutingProvider {
    /// Create a provider that returns the given matrix for any non-empty input.
    #[must_use]
    pub fn with_matrix(matrix: DistanceMatrix) -> Self {
        Self {
            response: StubResponse::Matrix(matrix),
            geometry: RawGeometry::new(STUB_GEOMETRY),
        }
    }

    /// Create a provider that fails every non-empty request with `error`.
    ///
    /// Empty input still returns [`RoutingError::EmptyInput`].
    #[must_use]
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            response: StubResponse::Error(error),
            geometry: RawGeometry::new(STUB_GEOMETRY),
        }
    }

    /// Create a provider returning a unit matrix of the given size.
    ///
    /// Zero on the diagonal and one metre everywhere else.
    #[must_use]
    pub fn with_unit_matrix(size: usize) -> Self {
        Self::with_matrix(
            (0..size)
                .map(|i| (0..size).map(|j| i64::from(i != j)).collect())
                .collect(),
        )
    }

    /// Replace the geometry body returned by successful route requests.
    #[must_use]
    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = RawGeometry::new(geometry);
        self
    }
}

impl DistanceMatrixProvider for StubRoutingProvider {
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        if locations.is_empty() {
            return Err(RoutingError::EmptyInput);
        }

        match &self.response {
            StubResponse::Matrix(matrix) => Ok(matrix.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

impl GeometryProvider for StubRoutingProvider {
    fn route_geometry(&self, path: &[Location]) -> Result<RawGeometry, RoutingError> {
        if path.is_empty() {
            return Err(RoutingError::EmptyInput);
        }

        match &self.response {
            StubResponse::Matrix(_) => Ok(self.geometry.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
