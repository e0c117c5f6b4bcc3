//! Geographic positions of depots and customers.

use geo::Coord;
use thiserror::Error;

/// A WGS84 position.
///
/// Routing engines and `geo` use `(x = longitude, y = latitude)` axis order;
/// convert with [`Location::to_coord`] rather than building coordinates by
/// hand.
///
/// # Examples
/// ```
/// use reparto_core::Location;
///
/// let depot = Location::new(-34.6037, -58.3816);
/// let coord = depot.to_coord();
/// assert_eq!(coord.x, -58.3816);
/// assert_eq!(coord.y, -34.6037);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Errors returned by [`Location::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LocationError {
    /// A component was NaN or infinite.
    #[error("coordinates must be finite (lat {latitude}, lon {longitude})")]
    NonFinite {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Location {
    /// Construct a location from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within WGS84 bounds.
    ///
    /// # Errors
    ///
    /// Returns the first [`LocationError`] found.
    pub fn validate(&self) -> Result<(), LocationError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(LocationError::NonFinite {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(LocationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LocationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    /// Convert to a `geo` coordinate in `(lon, lat)` order.
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl From<Location> for Coord<f64> {
    fn from(location: Location) -> Self {
        location.to_coord()
    }
}

impl From<Coord<f64>> for Location {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}
