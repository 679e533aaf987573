//! Car use-cases and driver assignment.
//!
//! # Invariants
//! - Assignment edits mutate the caller's in-memory car and then persist the
//!   whole driver set through [`CarStore::update`].
//! - Edits are not atomic against another writer changing the same car
//!   between the caller's read and this update; the last full set wins.

use crate::model::car::{Car, CarId, NewCar};
use crate::model::driver::{Driver, DriverId};
use crate::repo::car_store::CarStore;
use crate::service::{require, EntityKind, ServiceResult};
use log::info;

pub struct CarService<S: CarStore> {
    store: S,
}

impl<S: CarStore> CarService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create(&self, car: NewCar) -> ServiceResult<Car> {
        Ok(self.store.create(car)?)
    }

    pub fn get(&self, id: CarId) -> ServiceResult<Car> {
        require(self.store.get(id)?, EntityKind::Car, id)
    }

    pub fn get_all(&self) -> ServiceResult<Vec<Car>> {
        Ok(self.store.get_all()?)
    }

    pub fn update(&self, car: &Car) -> ServiceResult<Car> {
        Ok(self.store.update(car)?)
    }

    pub fn delete(&self, id: CarId) -> ServiceResult<bool> {
        Ok(self.store.delete(id)?)
    }

    pub fn get_all_by_driver(&self, driver_id: DriverId) -> ServiceResult<Vec<Car>> {
        Ok(self.store.get_all_by_driver(driver_id)?)
    }

    /// Adds `driver` to `car` and rewrites its assignments.
    pub fn assign_driver(&self, driver: &Driver, car: &mut Car) -> ServiceResult<()> {
        car.add_driver(driver.clone());
        self.store.update(car)?;
        info!(
            "event=car_assign_driver module=service status=ok car_id={} driver_id={}",
            car.id, driver.id
        );
        Ok(())
    }

    /// Removes `driver` from `car` and rewrites its assignments.
    pub fn unassign_driver(&self, driver: &Driver, car: &mut Car) -> ServiceResult<()> {
        car.remove_driver(driver.id);
        self.store.update(car)?;
        info!(
            "event=car_unassign_driver module=service status=ok car_id={} driver_id={}",
            car.id, driver.id
        );
        Ok(())
    }
}
