//! Application wiring: one provider, three stores, three services.
//!
//! Built once at process start and passed to callers by reference.

use crate::config::FleetConfig;
use crate::db::{ConnectionProvider, DbResult};
use crate::repo::car_store::SqliteCarStore;
use crate::repo::driver_store::SqliteDriverStore;
use crate::repo::manufacturer_store::SqliteManufacturerStore;
use crate::service::car_service::CarService;
use crate::service::driver_service::DriverService;
use crate::service::manufacturer_service::ManufacturerService;

pub struct FleetContext {
    pub manufacturers: ManufacturerService<SqliteManufacturerStore>,
    pub drivers: DriverService<SqliteDriverStore>,
    pub cars: CarService<SqliteCarStore>,
}

impl FleetContext {
    /// Opens the configured database and wires the services over it.
    pub fn open(config: &FleetConfig) -> DbResult<Self> {
        let provider = ConnectionProvider::open(&config.database)?;
        Ok(Self::with_provider(provider))
    }

    pub fn with_provider(provider: ConnectionProvider) -> Self {
        Self {
            manufacturers: ManufacturerService::new(SqliteManufacturerStore::new(
                provider.clone(),
            )),
            drivers: DriverService::new(SqliteDriverStore::new(provider.clone())),
            cars: CarService::new(SqliteCarStore::new(provider)),
        }
    }
}
