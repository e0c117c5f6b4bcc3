//! Delivery sessions: one driver's physical run on one date.
//!
//! A session moves through `none -> started -> finished`. [`DeliverySessions`]
//! drives the transitions against the persistence traits in
//! [`crate::store`]; the types here are the persisted shapes.

mod error;
mod lifecycle;

use jiff::{Timestamp, civil::Date};

use crate::{CustomerId, DriverId, ScheduledDelivery, SessionId};

pub use error::SessionError;
pub use lifecycle::DeliverySessions;

/// Units of the regular and special products.
///
/// # Examples
/// ```
/// use reparto_core::Quantities;
///
/// let planned = Quantities::new(100, 50);
/// let delivered = Quantities::new(80, 60);
/// assert_eq!(planned.saturating_sub(delivered), Quantities::new(20, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantities {
    /// Regular product units.
    pub regular: u64,
    /// Special product units.
    pub special: u64,
}

impl Quantities {
    /// Construct a quantity pair.
    #[must_use]
    pub const fn new(regular: u64, special: u64) -> Self {
        Self { regular, special }
    }

    /// Component-wise difference, floored at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self {
            regular: self.regular.saturating_sub(other.regular),
            special: self.special.saturating_sub(other.special),
        }
    }

    /// Sum planned quantities over scheduled rows; missing values count as zero.
    #[must_use]
    pub fn planned(rows: &[ScheduledDelivery]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            regular: acc.regular + u64::from(row.planned_regular_qty.unwrap_or(0)),
            special: acc.special + u64::from(row.planned_special_qty.unwrap_or(0)),
        })
    }

    /// Sum delivered quantities over delivery records; missing values count as zero.
    #[must_use]
    pub fn delivered(records: &[DeliveryRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, record| Self {
            regular: acc.regular + u64::from(record.regular_qty_delivered.unwrap_or(0)),
            special: acc.special + u64::from(record.special_qty_delivered.unwrap_or(0)),
        })
    }
}

/// Lifecycle position of a persisted session.
///
/// The absence of a session for a `(driver, date)` pair is the implicit
/// initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionState {
    /// Started and still out on the road.
    Started,
    /// Returned to the depot and reconciled. Terminal.
    Finished,
}

/// A persisted delivery session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliverySession {
    /// Session identifier.
    pub id: SessionId,
    /// Driver running the route.
    pub driver_id: DriverId,
    /// Run date.
    pub date: Date,
    /// Units loaded at the depot.
    pub planned: Quantities,
    /// Units brought back; zero until the session is finished.
    pub returned: Quantities,
    /// When the driver returned; `None` while the run is in progress.
    pub return_timestamp: Option<Timestamp>,
}

impl DeliverySession {
    /// Derive the lifecycle state from the return timestamp.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.return_timestamp.is_some() {
            SessionState::Finished
        } else {
            SessionState::Started
        }
    }
}

/// Values needed to persist a freshly started session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDeliverySession {
    /// Driver running the route.
    pub driver_id: DriverId,
    /// Run date.
    pub date: Date,
    /// Units loaded at the depot.
    pub planned: Quantities,
}

/// Quantities handed to one customer during a session.
///
/// Created by delivery registration; sessions only read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryRecord {
    /// Session the delivery belongs to.
    pub session_id: SessionId,
    /// Customer served.
    pub customer_id: CustomerId,
    /// Regular units delivered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub regular_qty_delivered: Option<u32>,
    /// Special units delivered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub special_qty_delivered: Option<u32>,
}

/// Closeout figures produced when a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reconciliation {
    /// Session that was closed.
    pub session_id: SessionId,
    /// Units loaded at the start.
    pub planned: Quantities,
    /// Units recorded as delivered.
    pub delivered: Quantities,
    /// Units returned, floored at zero per product.
    pub returned: Quantities,
    /// Recorded return time.
    pub returned_at: Timestamp,
}
