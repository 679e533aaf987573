//! Car entity and its driver assignment set.
//!
//! # Invariants
//! - `drivers` is the full desired assignment; stores rewrite the association
//!   rows from it on every create/update.
//! - Drivers are matched by id; a driver appears at most once.

use super::driver::{Driver, DriverId};
use super::manufacturer::Manufacturer;
use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type CarId = i64;

/// Unsaved car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCar {
    pub model: String,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<Driver>,
}

impl NewCar {
    /// Draft with no drivers assigned.
    pub fn new(model: impl Into<String>, manufacturer: Manufacturer) -> Self {
        Self {
            model: model.into(),
            manufacturer,
            drivers: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("car", "model", &self.model)
    }

    pub fn driver_ids(&self) -> BTreeSet<DriverId> {
        self.drivers.iter().map(|driver| driver.id).collect()
    }

    pub fn with_id(self, id: CarId) -> Car {
        Car {
            id,
            model: self.model,
            manufacturer: self.manufacturer,
            drivers: self.drivers,
        }
    }
}

/// Persisted, active car with its currently assigned, active drivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub model: String,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<Driver>,
}

impl Car {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("car", "model", &self.model)
    }

    /// Deduplicated ids of the assigned drivers.
    pub fn driver_ids(&self) -> BTreeSet<DriverId> {
        self.drivers.iter().map(|driver| driver.id).collect()
    }

    pub fn has_driver(&self, driver_id: DriverId) -> bool {
        self.drivers.iter().any(|driver| driver.id == driver_id)
    }

    /// Adds `driver` unless a driver with the same id is already assigned.
    ///
    /// Returns whether the set changed.
    pub fn add_driver(&mut self, driver: Driver) -> bool {
        if self.has_driver(driver.id) {
            return false;
        }
        self.drivers.push(driver);
        true
    }

    /// Collapses repeated entries for the same driver id, keeping the first.
    pub fn dedup_drivers(&mut self) {
        let mut seen = BTreeSet::new();
        self.drivers.retain(|driver| seen.insert(driver.id));
    }

    /// Removes every entry with `driver_id`. Returns whether the set changed.
    pub fn remove_driver(&mut self, driver_id: DriverId) -> bool {
        let before = self.drivers.len();
        self.drivers.retain(|driver| driver.id != driver_id);
        self.drivers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::{Car, NewCar};
    use crate::model::driver::NewDriver;
    use crate::model::manufacturer::NewManufacturer;

    fn camry() -> Car {
        NewCar::new("Camry", NewManufacturer::new("Toyota", "Japan").with_id(1)).with_id(10)
    }

    #[test]
    fn add_driver_ignores_duplicates() {
        let mut car = camry();
        let driver = NewDriver::new("A. Smith", "LIC1", "asmith", "pw").with_id(100);

        assert!(car.add_driver(driver.clone()));
        assert!(!car.add_driver(driver));
        assert_eq!(car.drivers.len(), 1);
    }

    #[test]
    fn remove_driver_reports_change() {
        let mut car = camry();
        car.add_driver(NewDriver::new("A. Smith", "LIC1", "asmith", "pw").with_id(100));
        car.add_driver(NewDriver::new("B. Jones", "LIC2", "bjones", "pw").with_id(101));

        assert!(car.remove_driver(100));
        assert!(!car.remove_driver(100));
        assert_eq!(car.driver_ids().into_iter().collect::<Vec<_>>(), vec![101]);
    }

    #[test]
    fn dedup_drivers_keeps_first_entry_per_id() {
        let mut car = camry();
        let smith = NewDriver::new("A. Smith", "LIC1", "asmith", "pw").with_id(100);
        let jones = NewDriver::new("B. Jones", "LIC2", "bjones", "pw").with_id(101);
        car.drivers = vec![smith.clone(), jones.clone(), smith.clone()];

        car.dedup_drivers();

        assert_eq!(car.drivers, vec![smith, jones]);
    }

    #[test]
    fn blank_model_fails_validation() {
        let mut car = camry();
        car.model = "\t".to_string();
        assert!(car.validate().is_err());
    }
}
