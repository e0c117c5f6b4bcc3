//! Planned deliveries per route and date.

use std::{fmt, str::FromStr};

use jiff::civil::Date;

use crate::{CustomerId, RouteId};

/// Delivery state of a scheduled row.
///
/// The wire names match the planning system (`PROGRAMADO`, `ENTREGADO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeliveryState {
    /// Planned, not yet delivered.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "PROGRAMADO"))]
    Scheduled,
    /// Delivered by the driver.
    #[cfg_attr(feature = "serde", serde(rename = "ENTREGADO"))]
    Delivered,
}

impl DeliveryState {
    /// Return the stored name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "PROGRAMADO",
            Self::Delivered => "ENTREGADO",
        }
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`DeliveryState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown delivery state {0:?}")]
pub struct ParseDeliveryStateError(pub String);

impl FromStr for DeliveryState {
    type Err = ParseDeliveryStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROGRAMADO" => Ok(Self::Scheduled),
            "ENTREGADO" => Ok(Self::Delivered),
            other => Err(ParseDeliveryStateError(other.to_owned())),
        }
    }
}

/// One customer's planned delivery on a route for a date.
///
/// Missing planned quantities count as zero when sessions aggregate them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledDelivery {
    /// Route the delivery belongs to.
    pub route_id: RouteId,
    /// Customer receiving the delivery.
    pub customer_id: CustomerId,
    /// Delivery date.
    pub date: Date,
    /// Planned units of the regular product.
    #[cfg_attr(feature = "serde", serde(default))]
    pub planned_regular_qty: Option<u32>,
    /// Planned units of the special product.
    #[cfg_attr(feature = "serde", serde(default))]
    pub planned_special_qty: Option<u32>,
    /// Product description carried from planning.
    #[cfg_attr(feature = "serde", serde(default))]
    pub product_name: String,
    /// Current state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub state: DeliveryState,
}
