//! Driver use-cases, including the credential lookup used by login.

use crate::model::driver::{Driver, DriverId, NewDriver};
use crate::repo::driver_store::DriverStore;
use crate::service::{require, EntityKind, ServiceResult};

pub struct DriverService<S: DriverStore> {
    store: S,
}

impl<S: DriverStore> DriverService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a driver. A login already held by an active driver fails
    /// with a storage error.
    pub fn create(&self, driver: NewDriver) -> ServiceResult<Driver> {
        Ok(self.store.create(driver)?)
    }

    pub fn get(&self, id: DriverId) -> ServiceResult<Driver> {
        require(self.store.get(id)?, EntityKind::Driver, id)
    }

    pub fn get_all(&self) -> ServiceResult<Vec<Driver>> {
        Ok(self.store.get_all()?)
    }

    pub fn update(&self, driver: &Driver) -> ServiceResult<Driver> {
        Ok(self.store.update(driver)?)
    }

    /// Soft-deletes the driver; cars drop it from their driver list on the
    /// next read without an explicit unassign.
    pub fn delete(&self, id: DriverId) -> ServiceResult<bool> {
        Ok(self.store.delete(id)?)
    }

    /// Absence is a normal outcome here, not `NotFound`.
    pub fn find_by_login(&self, login: &str) -> ServiceResult<Option<Driver>> {
        Ok(self.store.find_by_login(login)?)
    }
}
