//! Offline provider using great-circle distances.
//!
//! Useful when no routing engine is reachable and in tests. Distances ignore
//! the road network, so orders computed from them are only approximations of
//! the driving order.

use geo::{Distance, Haversine, Point};
use serde_json::json;

use crate::Location;

use super::error::RoutingError;
use super::provider::{
    DistanceMatrix, DistanceMatrixProvider, GeometryProvider, RawGeometry, validate_locations,
};

/// Great-circle distances in whole metres, straight-line geometry.
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineDistanceProvider;

fn metres_between(from: Location, to: Location) -> i64 {
    let metres = Haversine.distance(Point::from(from.to_coord()), Point::from(to.to_coord()));
    metres.round() as i64
}

impl DistanceMatrixProvider for HaversineDistanceProvider {
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        validate_locations(locations)?;
        Ok(locations
            .iter()
            .map(|from| {
                locations
                    .iter()
                    .map(|to| metres_between(*from, *to))
                    .collect()
            })
            .collect())
    }
}

impl GeometryProvider for HaversineDistanceProvider {
    /// Return a GeoJSON `LineString` joining the points directly.
    fn route_geometry(&self, path: &[Location]) -> Result<RawGeometry, RoutingError> {
        validate_locations(path)?;
        let coordinates: Vec<[f64; 2]> = path
            .iter()
            .map(|location| [location.longitude, location.latitude])
            .collect();
        let line = json!({ "type": "LineString", "coordinates": coordinates });
        Ok(RawGeometry::new(line.to_string()))
    }
}
