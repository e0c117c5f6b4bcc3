//! SQLite-backed implementation of every store trait.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use jiff::{Timestamp, civil::Date};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params, params_from_iter};
use thiserror::Error;

use crate::schedule::ParseDeliveryStateError;
use crate::{
    Customer, CustomerId, DeliveryRecord, DeliverySession, DeliveryState, DriverId, Location,
    NewDeliverySession, Quantities, Route, RouteAssignment, RouteId, ScheduledDelivery, SessionId,
};

use super::{
    CustomerDirectory, DeliveryRecordStore, RouteStore, ScheduleStore, SessionStore, StoreError,
};

/// SQLite limits bound parameters per statement to 999 by default. The store
/// chunks `IN` queries to remain below that ceiling.
const SQLITE_MAX_VARIABLE_NUMBER: usize = 999;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    latitude REAL,
    longitude REAL,
    regular_price REAL,
    special_price REAL
);
CREATE TABLE IF NOT EXISTS routes (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    origin_latitude REAL NOT NULL,
    origin_longitude REAL NOT NULL,
    driver_id INTEGER
);
CREATE TABLE IF NOT EXISTS route_assignments (
    route_id INTEGER NOT NULL REFERENCES routes(id),
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    position INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (route_id, customer_id)
);
CREATE TABLE IF NOT EXISTS scheduled_deliveries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES routes(id),
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    date TEXT NOT NULL,
    planned_regular_qty INTEGER,
    planned_special_qty INTEGER,
    product_name TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT 'PROGRAMADO'
);
CREATE INDEX IF NOT EXISTS scheduled_deliveries_route_date
    ON scheduled_deliveries (route_id, date);
CREATE TABLE IF NOT EXISTS delivery_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    driver_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    planned_regular_qty INTEGER NOT NULL,
    planned_special_qty INTEGER NOT NULL,
    returned_regular_qty INTEGER NOT NULL DEFAULT 0,
    returned_special_qty INTEGER NOT NULL DEFAULT 0,
    return_timestamp TEXT,
    UNIQUE (driver_id, date)
);
CREATE TABLE IF NOT EXISTS delivery_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL REFERENCES delivery_sessions(id),
    customer_id INTEGER NOT NULL,
    regular_qty_delivered INTEGER,
    special_qty_delivered INTEGER
);
";

/// Error raised while opening or reading the SQLite database.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored date or timestamp could not be parsed.
    #[error("invalid {column} value {value:?}: {source}")]
    InvalidTime {
        /// Column holding the value.
        column: &'static str,
        /// Stored text.
        value: String,
        /// Parser failure.
        #[source]
        source: jiff::Error,
    },
    /// A stored delivery state was not recognised.
    #[error(transparent)]
    InvalidState(#[from] ParseDeliveryStateError),
    /// Generic SQLite error.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl From<SqliteStoreError> for StoreError {
    fn from(err: SqliteStoreError) -> Self {
        Self::backend(err.to_string())
    }
}

/// Read-write store backed by a single SQLite connection.
///
/// The schema is created on open. `(driver_id, date)` is unique in
/// `delivery_sessions`, so concurrent session starts cannot both succeed.
pub struct SqliteStore {
    connection: Connection,
    path: Option<PathBuf>,
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| SqliteStoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(connection, Some(path.to_path_buf()))
    }

    /// Create a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection = Connection::open_in_memory()?;
        Self::with_connection(connection, None)
    }

    fn with_connection(
        connection: Connection,
        path: Option<PathBuf>,
    ) -> Result<Self, SqliteStoreError> {
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self { connection, path })
    }

    /// Insert or replace a customer.
    pub fn insert_customer(&self, customer: &Customer) -> Result<(), SqliteStoreError> {
        self.connection.execute(
            "INSERT OR REPLACE INTO customers \
             (id, name, latitude, longitude, regular_price, special_price) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                customer.id.get(),
                customer.name,
                customer.location.latitude,
                customer.location.longitude,
                customer.regular_price,
                customer.special_price,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a route.
    pub fn insert_route(&self, route: &Route) -> Result<(), SqliteStoreError> {
        self.connection.execute(
            "INSERT OR REPLACE INTO routes \
             (id, name, origin_latitude, origin_longitude, driver_id) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                route.id.get(),
                route.name,
                route.origin.latitude,
                route.origin.longitude,
                route.driver_id.map(DriverId::get),
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a route assignment.
    pub fn insert_assignment(&self, assignment: &RouteAssignment) -> Result<(), SqliteStoreError> {
        self.connection.execute(
            "INSERT OR REPLACE INTO route_assignments (route_id, customer_id, position) \
             VALUES (?1, ?2, ?3)",
            params![
                assignment.route_id.get(),
                assignment.customer_id.get(),
                assignment.order,
            ],
        )?;
        Ok(())
    }

    /// Append a scheduled delivery.
    pub fn insert_scheduled_delivery(
        &self,
        delivery: &ScheduledDelivery,
    ) -> Result<(), SqliteStoreError> {
        self.connection.execute(
            "INSERT INTO scheduled_deliveries \
             (route_id, customer_id, date, planned_regular_qty, planned_special_qty, \
              product_name, state) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                delivery.route_id.get(),
                delivery.customer_id.get(),
                delivery.date.to_string(),
                delivery.planned_regular_qty,
                delivery.planned_special_qty,
                delivery.product_name,
                delivery.state.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Append a delivery record.
    pub fn insert_delivery_record(&self, record: &DeliveryRecord) -> Result<(), SqliteStoreError> {
        self.connection.execute(
            "INSERT INTO delivery_records \
             (session_id, customer_id, regular_qty_delivered, special_qty_delivered) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.session_id.get(),
                record.customer_id.get(),
                record.regular_qty_delivered,
                record.special_qty_delivered,
            ],
        )?;
        Ok(())
    }

    fn load_customers_chunk(
        &self,
        ids: &[CustomerId],
    ) -> Result<HashMap<CustomerId, Customer>, SqliteStoreError> {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT id, name, latitude, longitude, regular_price, special_price \
             FROM customers WHERE id IN ({placeholders})"
        );
        let mut statement = self.connection.prepare(&query)?;
        let rows = statement.query_map(params_from_iter(ids.iter().map(|id| id.get())), |row| {
            customer_from_row(row)
        })?;
        let mut found = HashMap::new();
        for customer in rows {
            let customer = customer?;
            found.insert(customer.id, customer);
        }
        Ok(found)
    }

    fn load_session(
        &self,
        clause: &str,
        params: impl rusqlite::Params,
    ) -> Result<Option<DeliverySession>, SqliteStoreError> {
        let query = format!(
            "SELECT id, driver_id, date, planned_regular_qty, planned_special_qty, \
             returned_regular_qty, returned_special_qty, return_timestamp \
             FROM delivery_sessions WHERE {clause}"
        );
        let raw = self
            .connection
            .query_row(&query, params, |row| {
                Ok(RawSession {
                    id: row.get(0)?,
                    driver_id: row.get(1)?,
                    date: row.get(2)?,
                    planned: Quantities::new(row.get(3)?, row.get(4)?),
                    returned: Quantities::new(row.get(5)?, row.get(6)?),
                    return_timestamp: row.get(7)?,
                })
            })
            .optional()?;
        raw.map(RawSession::decode).transpose()
    }
}

struct RawSession {
    id: u64,
    driver_id: u64,
    date: String,
    planned: Quantities,
    returned: Quantities,
    return_timestamp: Option<String>,
}

impl RawSession {
    fn decode(self) -> Result<DeliverySession, SqliteStoreError> {
        let return_timestamp = self
            .return_timestamp
            .map(|value| parse_timestamp(&value))
            .transpose()?;
        Ok(DeliverySession {
            id: SessionId(self.id),
            driver_id: DriverId(self.driver_id),
            date: parse_date(&self.date)?,
            planned: self.planned,
            returned: self.returned,
            return_timestamp,
        })
    }
}

fn parse_date(value: &str) -> Result<Date, SqliteStoreError> {
    value
        .parse()
        .map_err(|source| SqliteStoreError::InvalidTime {
            column: "date",
            value: value.to_owned(),
            source,
        })
}

fn parse_timestamp(value: &str) -> Result<Timestamp, SqliteStoreError> {
    value
        .parse()
        .map_err(|source| SqliteStoreError::InvalidTime {
            column: "return_timestamp",
            value: value.to_owned(),
            source,
        })
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    // Customers imported without coordinates sit at the origin of the datum.
    let latitude: Option<f64> = row.get(2)?;
    let longitude: Option<f64> = row.get(3)?;
    let name: String = row.get(1)?;
    Ok(Customer::new(
        CustomerId(row.get(0)?),
        name,
        Location::new(latitude.unwrap_or(0.0), longitude.unwrap_or(0.0)),
    )
    .with_prices(row.get(4)?, row.get(5)?))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

impl CustomerDirectory for SqliteStore {
    fn customers_by_ids(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, StoreError> {
        let mut found = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(SQLITE_MAX_VARIABLE_NUMBER) {
            found.extend(self.load_customers_chunk(chunk)?);
        }
        Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
    }

    fn all_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT id, name, latitude, longitude, regular_price, special_price \
                 FROM customers ORDER BY id",
            )
            .map_err(SqliteStoreError::from)?;
        let customers = statement
            .query_map([], |row| customer_from_row(row))
            .and_then(Iterator::collect::<rusqlite::Result<Vec<_>>>)
            .map_err(SqliteStoreError::from)?;
        Ok(customers)
    }
}

impl RouteStore for SqliteStore {
    fn route(&self, id: RouteId) -> Result<Option<Route>, StoreError> {
        let route = self
            .connection
            .query_row(
                "SELECT id, name, origin_latitude, origin_longitude, driver_id \
                 FROM routes WHERE id = ?1",
                [id.get()],
                |row| {
                    let name: String = row.get(1)?;
                    let driver: Option<u64> = row.get(4)?;
                    Ok(Route {
                        id: RouteId(row.get(0)?),
                        name,
                        origin: Location::new(row.get(2)?, row.get(3)?),
                        driver_id: driver.map(DriverId),
                    })
                },
            )
            .optional()
            .map_err(SqliteStoreError::from)?;
        Ok(route)
    }

    fn assignments(&self, route_id: RouteId) -> Result<Vec<RouteAssignment>, StoreError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT route_id, customer_id, position FROM route_assignments \
                 WHERE route_id = ?1 ORDER BY position, customer_id",
            )
            .map_err(SqliteStoreError::from)?;
        let assignments = statement
            .query_map([route_id.get()], |row| {
                Ok(RouteAssignment::new(
                    RouteId(row.get(0)?),
                    CustomerId(row.get(1)?),
                    row.get(2)?,
                ))
            })
            .and_then(Iterator::collect::<rusqlite::Result<Vec<_>>>)
            .map_err(SqliteStoreError::from)?;
        Ok(assignments)
    }
}

impl ScheduleStore for SqliteStore {
    fn scheduled_deliveries(
        &self,
        route_id: RouteId,
        date: Date,
    ) -> Result<Vec<ScheduledDelivery>, StoreError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT customer_id, planned_regular_qty, planned_special_qty, product_name, \
                 state FROM scheduled_deliveries WHERE route_id = ?1 AND date = ?2 ORDER BY id",
            )
            .map_err(SqliteStoreError::from)?;
        let rows = statement
            .query_map(params![route_id.get(), date.to_string()], |row| {
                Ok((
                    CustomerId(row.get(0)?),
                    row.get::<_, Option<u32>>(1)?,
                    row.get::<_, Option<u32>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .and_then(Iterator::collect::<rusqlite::Result<Vec<_>>>)
            .map_err(SqliteStoreError::from)?;

        let mut deliveries = Vec::with_capacity(rows.len());
        for (customer_id, regular, special, product_name, state) in rows {
            let state: DeliveryState = state.parse().map_err(SqliteStoreError::from)?;
            deliveries.push(ScheduledDelivery {
                route_id,
                customer_id,
                date,
                planned_regular_qty: regular,
                planned_special_qty: special,
                product_name,
                state,
            });
        }
        Ok(deliveries)
    }
}

impl SessionStore for SqliteStore {
    fn session(&self, id: SessionId) -> Result<Option<DeliverySession>, StoreError> {
        Ok(self.load_session("id = ?1", [id.get()])?)
    }

    fn find_session(
        &self,
        driver_id: DriverId,
        date: Date,
    ) -> Result<Option<DeliverySession>, StoreError> {
        Ok(self.load_session(
            "driver_id = ?1 AND date = ?2",
            params![driver_id.get(), date.to_string()],
        )?)
    }

    fn create_session(&self, session: &NewDeliverySession) -> Result<SessionId, StoreError> {
        let inserted = self.connection.execute(
            "INSERT INTO delivery_sessions \
             (driver_id, date, planned_regular_qty, planned_special_qty) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.driver_id.get(),
                session.date.to_string(),
                session.planned.regular,
                session.planned.special,
            ],
        );
        match inserted {
            Ok(_) => {
                let id = u64::try_from(self.connection.last_insert_rowid())
                    .map_err(|err| StoreError::backend(err.to_string()))?;
                Ok(SessionId(id))
            }
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateSession {
                driver_id: session.driver_id,
                date: session.date,
            }),
            Err(err) => Err(SqliteStoreError::from(err).into()),
        }
    }

    fn record_return(
        &self,
        id: SessionId,
        returned: Quantities,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let updated = self
            .connection
            .execute(
                "UPDATE delivery_sessions SET returned_regular_qty = ?1, \
                 returned_special_qty = ?2, return_timestamp = ?3 \
                 WHERE id = ?4 AND return_timestamp IS NULL",
                params![returned.regular, returned.special, at.to_string(), id.get()],
            )
            .map_err(SqliteStoreError::from)?;
        if updated > 0 {
            return Ok(());
        }
        match self.session(id)?.and_then(|session| session.return_timestamp) {
            Some(finished_at) => Err(StoreError::SessionFinished {
                session_id: id,
                finished_at,
            }),
            None => Err(StoreError::Missing {
                entity: "session",
                id: id.get(),
            }),
        }
    }
}

impl DeliveryRecordStore for SqliteStore {
    fn delivery_records(&self, session_id: SessionId) -> Result<Vec<DeliveryRecord>, StoreError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT customer_id, regular_qty_delivered, special_qty_delivered \
                 FROM delivery_records WHERE session_id = ?1 ORDER BY id",
            )
            .map_err(SqliteStoreError::from)?;
        let records = statement
            .query_map([session_id.get()], |row| {
                Ok(DeliveryRecord {
                    session_id,
                    customer_id: CustomerId(row.get(0)?),
                    regular_qty_delivered: row.get(1)?,
                    special_qty_delivered: row.get(2)?,
                })
            })
            .and_then(Iterator::collect::<rusqlite::Result<Vec<_>>>)
            .map_err(SqliteStoreError::from)?;
        Ok(records)
    }
}
