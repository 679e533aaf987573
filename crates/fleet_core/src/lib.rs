//! Persistence core of the fleet backend.
//! Manufacturers, drivers, cars and the car/driver assignment live here.

pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{authenticate, AccessDecision, AccessGate};
pub use config::{DatabaseTarget, FleetConfig};
pub use context::FleetContext;
pub use db::{ConnectionError, ConnectionProvider};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::car::{Car, CarId, NewCar};
pub use model::driver::{Driver, DriverId, NewDriver};
pub use model::manufacturer::{Manufacturer, ManufacturerId, NewManufacturer};
pub use model::ValidationError;
pub use repo::car_store::{CarStore, SqliteCarStore};
pub use repo::driver_store::{DriverStore, SqliteDriverStore};
pub use repo::manufacturer_store::{ManufacturerStore, SqliteManufacturerStore};
pub use repo::{StoreError, StoreResult};
pub use service::car_service::CarService;
pub use service::driver_service::DriverService;
pub use service::manufacturer_service::ManufacturerService;
pub use service::{EntityKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
