//! Test-only utilities for `reparto-solver`.
//!
//! Available to unit tests and, through the `test-support` feature, to
//! integration tests and benchmarks.

use reparto_core::{Customer, CustomerId, Location};

/// Construct a customer named after its identifier.
///
/// # Examples
/// ```rust
/// use reparto_core::CustomerId;
/// use reparto_solver::test_support::customer;
///
/// let customer = customer(4, -34.6, -58.4);
/// assert_eq!(customer.id, CustomerId(4));
/// assert_eq!(customer.name, "customer-4");
/// ```
#[must_use]
pub fn customer(id: u64, latitude: f64, longitude: f64) -> Customer {
    Customer::new(
        CustomerId(id),
        format!("customer-{id}"),
        Location::new(latitude, longitude),
    )
}

