//! Delivery routes and their customer assignments.
//!
//! Routes are created by route management and are read-only here.

use crate::{CustomerId, DriverId, Location, RouteId};

/// A named delivery route leaving from a depot.
///
/// # Examples
/// ```
/// use reparto_core::{DriverId, Location, Route, RouteId};
///
/// let route = Route::new(RouteId(1), "Zona norte", Location::new(-34.5, -58.5))
///     .with_driver(DriverId(9));
/// assert_eq!(route.driver_id, Some(DriverId(9)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Route identifier.
    pub id: RouteId,
    /// Display name.
    pub name: String,
    /// Depot the vehicle leaves from and returns to.
    pub origin: Location,
    /// Driver currently assigned to the route.
    #[cfg_attr(feature = "serde", serde(default))]
    pub driver_id: Option<DriverId>,
}

impl Route {
    /// Construct a route without an assigned driver.
    pub fn new(id: RouteId, name: impl Into<String>, origin: Location) -> Self {
        Self {
            id,
            name: name.into(),
            origin,
            driver_id: None,
        }
    }

    /// Assign a driver.
    #[must_use]
    pub const fn with_driver(mut self, driver_id: DriverId) -> Self {
        self.driver_id = Some(driver_id);
        self
    }
}

/// Link between a route and one of its customers.
///
/// `order` is the position chosen by route management. The optimiser computes
/// its own order; `order` only fixes the sequence customers are listed in
/// before optimisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteAssignment {
    /// Owning route.
    pub route_id: RouteId,
    /// Assigned customer.
    pub customer_id: CustomerId,
    /// Position set by route management.
    pub order: u32,
}

impl RouteAssignment {
    /// Construct an assignment.
    #[must_use]
    pub const fn new(route_id: RouteId, customer_id: CustomerId, order: u32) -> Self {
        Self {
            route_id,
            customer_id,
            order,
        }
    }
}
