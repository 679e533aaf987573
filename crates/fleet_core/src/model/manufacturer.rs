use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type ManufacturerId = i64;

/// Unsaved manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewManufacturer {
    pub name: String,
    pub country: String,
}

impl NewManufacturer {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.country)
    }

    /// Attaches the identifier assigned by storage.
    pub fn with_id(self, id: ManufacturerId) -> Manufacturer {
        Manufacturer {
            id,
            name: self.name,
            country: self.country,
        }
    }
}

/// Persisted, active manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub name: String,
    pub country: String,
}

impl Manufacturer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.country)
    }
}

fn validate_fields(name: &str, country: &str) -> Result<(), ValidationError> {
    require_text("manufacturer", "name", name)?;
    require_text("manufacturer", "country", country)
}
