//! Service facade over the stores.
//!
//! # Responsibility
//! - Upgrade "absent" store lookups into [`ServiceError::NotFound`] for
//!   callers that expect the entity to exist.
//! - Expose relationship edits (assign/unassign driver) on top of the car
//!   store's full-set update.
//!
//! # Invariants
//! - Services stay storage-agnostic; they only talk to store traits.
//! - Store errors are passed through unchanged inside [`ServiceError::Store`].

use crate::repo::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod car_service;
pub mod driver_service;
pub mod manufacturer_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Manufacturer,
    Driver,
    Car,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Manufacturer => "manufacturer",
            Self::Driver => "driver",
            Self::Car => "car",
        })
    }
}

#[derive(Debug)]
pub enum ServiceError {
    /// An entity expected to exist is absent or soft-deleted.
    NotFound { entity: EntityKind, id: i64 },
    /// Login/password pair did not match an active driver.
    InvalidCredentials,
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidCredentials => f.write_str("login or password is incorrect"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Converts an optional lookup into `NotFound` when empty.
pub(crate) fn require<T>(found: Option<T>, entity: EntityKind, id: i64) -> ServiceResult<T> {
    found.ok_or_else(|| {
        log::warn!("event={entity}_get module=service status=not_found id={id}");
        ServiceError::NotFound { entity, id }
    })
}
