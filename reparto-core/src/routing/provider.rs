//! Routing-engine provider traits and the distance-matrix alias.

use std::fmt;

use crate::{Customer, Location};

use super::error::RoutingError;

/// Square matrix of driving distances in metres.
///
/// `matrix[i][j]` is the distance from `locations[i]` to `locations[j]`.
pub type DistanceMatrix = Vec<Vec<i64>>;

/// Sentinel distance for pairs the routing engine cannot connect.
pub const UNREACHABLE: i64 = i64::MAX;

/// Build a complete directed distance matrix for a set of locations.
///
/// Implementers must return an `n x n` matrix where `n == locations.len()`
/// and must reject empty input with [`RoutingError::EmptyInput`]. Providers
/// keep no state between calls.
///
/// # Examples
///
/// ```rust
/// use reparto_core::{DistanceMatrix, DistanceMatrixProvider, Location, RoutingError};
///
/// struct UnitProvider;
///
/// impl DistanceMatrixProvider for UnitProvider {
///     fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
///         if locations.is_empty() {
///             return Err(RoutingError::EmptyInput);
///         }
///         let n = locations.len();
///         Ok((0..n)
///             .map(|i| (0..n).map(|j| i64::from(i != j)).collect())
///             .collect())
///     }
/// }
///
/// let matrix = UnitProvider.build_matrix(&[Location::new(0.0, 0.0)])?;
/// assert_eq!(matrix, vec![vec![0]]);
/// # Ok::<(), RoutingError>(())
/// ```
pub trait DistanceMatrixProvider {
    /// Return the distance matrix for `locations`.
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError>;
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &T {
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        (**self).build_matrix(locations)
    }
}

/// Serialised road geometry, passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGeometry(String);

impl RawGeometry {
    /// Wrap a response body.
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Borrow the body.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the body.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RawGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fetch renderable geometry for an ordered path.
pub trait GeometryProvider {
    /// Return the routing engine's geometry for `path`, unmodified.
    fn route_geometry(&self, path: &[Location]) -> Result<RawGeometry, RoutingError>;

    /// Render the closed loop `origin -> customers... -> origin`.
    fn build_polyline(
        &self,
        origin: Location,
        ordered_customers: &[Customer],
    ) -> Result<RawGeometry, RoutingError> {
        self.route_geometry(&closed_loop(origin, ordered_customers))
    }
}

impl<T: GeometryProvider + ?Sized> GeometryProvider for &T {
    fn route_geometry(&self, path: &[Location]) -> Result<RawGeometry, RoutingError> {
        (**self).route_geometry(path)
    }
}

/// Depot, customers in the given order, then the depot again.
#[must_use]
pub fn closed_loop(origin: Location, ordered_customers: &[Customer]) -> Vec<Location> {
    let mut path = Vec::with_capacity(ordered_customers.len() + 2);
    path.push(origin);
    path.extend(ordered_customers.iter().map(|customer| customer.location));
    path.push(origin);
    path
}

/// Reject empty input and out-of-range coordinates.
///
/// # Errors
///
/// [`RoutingError::EmptyInput`] for an empty slice and
/// [`RoutingError::InvalidCoordinate`] for the first invalid location.
pub fn validate_locations(locations: &[Location]) -> Result<(), RoutingError> {
    if locations.is_empty() {
        return Err(RoutingError::EmptyInput);
    }
    for (index, location) in locations.iter().enumerate() {
        location
            .validate()
            .map_err(|reason| RoutingError::InvalidCoordinate { index, reason })?;
    }
    Ok(())
}

/// Check that `matrix` is `expected x expected`.
///
/// # Errors
///
/// [`RoutingError::MalformedMatrix`] describing the first mismatch.
pub fn ensure_square(matrix: &DistanceMatrix, expected: usize) -> Result<(), RoutingError> {
    if matrix.len() != expected {
        return Err(RoutingError::MalformedMatrix {
            expected,
            message: format!("got {} rows", matrix.len()),
        });
    }
    if let Some((row, cells)) = matrix
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != expected)
    {
        return Err(RoutingError::MalformedMatrix {
            expected,
            message: format!("row {row} has {} columns", cells.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CustomerId;
    use crate::test_support::UnitDistanceProvider;
    use rstest::rstest;

    fn sample_locations() -> Vec<Location> {
        vec![Location::new(0.0, 0.0), Location::new(1.0, 1.0)]
    }

    #[rstest]
    fn returns_square_matrix() {
        let locations = sample_locations();
        let matrix = UnitDistanceProvider
            .build_matrix(&locations)
            .expect("expected square matrix from UnitDistanceProvider");
        assert_eq!(matrix.len(), locations.len());
        assert!(matrix.iter().all(|row| row.len() == locations.len()));
        assert_eq!(matrix[0][0], 0);
        assert_eq!(matrix[0][1], 1);
    }

    #[rstest]
    fn errors_on_empty_input() {
        let err = UnitDistanceProvider
            .build_matrix(&[])
            .expect_err("expected EmptyInput for empty slice");
        assert_eq!(err, RoutingError::EmptyInput);
    }

    #[rstest]
    fn validate_reports_index_of_bad_location() {
        let locations = vec![Location::new(0.0, 0.0), Location::new(120.0, 0.0)];
        let err = validate_locations(&locations).expect_err("latitude 120 is invalid");
        assert!(matches!(
            err,
            RoutingError::InvalidCoordinate { index: 1, .. }
        ));
    }

    #[rstest]
    #[case(vec![vec![0, 1]], "got 1 rows")]
    #[case(vec![vec![0, 1], vec![1]], "row 1 has 1 columns")]
    fn ensure_square_rejects_ragged_matrices(
        #[case] matrix: DistanceMatrix,
        #[case] expected_message: &str,
    ) {
        let err = ensure_square(&matrix, 2).expect_err("matrix is not 2x2");
        match err {
            RoutingError::MalformedMatrix { expected, message } => {
                assert_eq!(expected, 2);
                assert_eq!(message, expected_message);
            }
            other => panic!("expected MalformedMatrix, got {other:?}"),
        }
    }

    #[rstest]
    fn closed_loop_returns_to_origin() {
        let origin = Location::new(10.0, 10.0);
        let customers = vec![
            Customer::new(CustomerId(1), "a", Location::new(11.0, 10.0)),
            Customer::new(CustomerId(2), "b", Location::new(12.0, 10.0)),
        ];
        let path = closed_loop(origin, &customers);
        assert_eq!(
            path,
            vec![
                origin,
                Location::new(11.0, 10.0),
                Location::new(12.0, 10.0),
                origin
            ]
        );
    }
}
