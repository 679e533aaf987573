//! Fleet domain model: manufacturers, drivers and cars.
//!
//! # Responsibility
//! - Define the in-memory shapes stores read and write.
//! - Separate unsaved drafts (`New*`) from persisted entities so identifiers
//!   can only come from storage.
//!
//! # Invariants
//! - Identifiers are assigned by the database at insert time.
//! - A `Car` owns value copies of its manufacturer and drivers; drivers never
//!   point back at cars.
//! - Soft-deleted rows never materialize as entities.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod car;
pub mod driver;
pub mod manufacturer;

/// Field-level rule violation detected before a write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity}.{field} must not be blank")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { entity, field });
    }
    Ok(())
}
