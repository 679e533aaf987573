use crate::model::manufacturer::{Manufacturer, ManufacturerId, NewManufacturer};
use crate::repo::manufacturer_store::ManufacturerStore;
use crate::service::{require, EntityKind, ServiceResult};

pub struct ManufacturerService<S: ManufacturerStore> {
    store: S,
}

impl<S: ManufacturerStore> ManufacturerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create(&self, manufacturer: NewManufacturer) -> ServiceResult<Manufacturer> {
        Ok(self.store.create(manufacturer)?)
    }

    /// Loads an active manufacturer or fails with `NotFound`.
    pub fn get(&self, id: ManufacturerId) -> ServiceResult<Manufacturer> {
        require(self.store.get(id)?, EntityKind::Manufacturer, id)
    }

    pub fn get_all(&self) -> ServiceResult<Vec<Manufacturer>> {
        Ok(self.store.get_all()?)
    }

    pub fn update(&self, manufacturer: &Manufacturer) -> ServiceResult<Manufacturer> {
        Ok(self.store.update(manufacturer)?)
    }

    pub fn delete(&self, id: ManufacturerId) -> ServiceResult<bool> {
        Ok(self.store.delete(id)?)
    }
}
