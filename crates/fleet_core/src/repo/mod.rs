//! Stores: CRUD persistence for fleet entities.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Map rows to entities and entities to statements.
//!
//! # Invariants
//! - Every operation acquires its own connection and releases it on return.
//! - Reads and updates only see rows with `is_deleted = 0`; `delete` is the
//!   only transition to `is_deleted = 1`.
//! - Absence is a valid result (`None`/`false`), never an error.
//! - Writes validate entities before touching storage.

use crate::db::ConnectionError;
use crate::model::ValidationError;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod car_store;
pub mod driver_store;
pub mod manufacturer_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Storage could not be reached.
    Connection(ConnectionError),
    /// A statement failed: constraint violation, I/O fault or malformed row.
    Storage(rusqlite::Error),
    /// Entity rejected before any statement ran.
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Validation(err) => write!(f, "invalid entity: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ConnectionError> for StoreError {
    fn from(value: ConnectionError) -> Self {
        Self::Connection(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Runs one store operation and emits its `event=<event> module=repo` line.
pub(crate) fn observe<T>(event: &'static str, op: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
    let started_at = Instant::now();
    let result = op();
    match &result {
        Ok(_) => debug!(
            "event={event} module=repo status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=repo status=error duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
