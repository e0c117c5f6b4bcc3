use crate::{CustomerId, Location};

/// A customer record as returned by the customer directory.
///
/// Directories read missing coordinates as `(0, 0)`; the optimiser routes such
/// customers like any other point.
///
/// # Examples
/// ```
/// use reparto_core::{Customer, CustomerId, Location};
///
/// let customer = Customer::new(CustomerId(3), "Panaderia Sur", Location::new(-34.6, -58.4));
/// assert_eq!(customer.id, CustomerId(3));
/// assert!(customer.regular_price.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    /// Directory identifier.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Delivery address position.
    pub location: Location,
    /// Negotiated price for the regular product, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub regular_price: Option<f64>,
    /// Negotiated price for the special product, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub special_price: Option<f64>,
}

impl Customer {
    /// Construct a customer without negotiated prices.
    pub fn new(id: CustomerId, name: impl Into<String>, location: Location) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            regular_price: None,
            special_price: None,
        }
    }

    /// Attach negotiated prices.
    #[must_use]
    pub const fn with_prices(mut self, regular: Option<f64>, special: Option<f64>) -> Self {
        self.regular_price = regular;
        self.special_price = special;
        self
    }
}
