//! Driver store contract and SQLite implementation.
//!
//! # Invariants
//! - `login` is unique among active drivers (partial unique index); a
//!   conflicting create/update fails with a storage error.
//! - `find_by_login` only matches active drivers.

use crate::db::ConnectionProvider;
use crate::model::driver::{Driver, DriverId, NewDriver};
use crate::repo::{observe, StoreResult};
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

const DRIVER_SELECT_SQL: &str = "SELECT
    id,
    name,
    license_number,
    login,
    password
FROM drivers";

/// CRUD over active drivers plus the login lookup.
pub trait DriverStore {
    fn create(&self, driver: NewDriver) -> StoreResult<Driver>;
    fn get(&self, id: DriverId) -> StoreResult<Option<Driver>>;
    fn get_all(&self) -> StoreResult<Vec<Driver>>;
    fn update(&self, driver: &Driver) -> StoreResult<Driver>;
    fn delete(&self, id: DriverId) -> StoreResult<bool>;
    fn find_by_login(&self, login: &str) -> StoreResult<Option<Driver>>;
}

#[derive(Clone)]
pub struct SqliteDriverStore {
    provider: ConnectionProvider,
}

impl SqliteDriverStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

impl DriverStore for SqliteDriverStore {
    fn create(&self, driver: NewDriver) -> StoreResult<Driver> {
        observe("driver_create", || {
            driver.validate()?;
            let conn = self.provider.acquire()?;
            conn.execute(
                "INSERT INTO drivers (name, license_number, login, password)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    driver.name,
                    driver.license_number,
                    driver.login,
                    driver.password
                ],
            )?;
            Ok(driver.with_id(conn.last_insert_rowid()))
        })
    }

    fn get(&self, id: DriverId) -> StoreResult<Option<Driver>> {
        observe("driver_get", || {
            let conn = self.provider.acquire()?;
            let driver = conn
                .query_row(
                    &format!("{DRIVER_SELECT_SQL} WHERE id = ?1 AND is_deleted = 0;"),
                    [id],
                    driver_from_row,
                )
                .optional()?;
            Ok(driver)
        })
    }

    fn get_all(&self) -> StoreResult<Vec<Driver>> {
        observe("driver_get_all", || {
            let conn = self.provider.acquire()?;
            let mut stmt = conn.prepare(&format!(
                "{DRIVER_SELECT_SQL} WHERE is_deleted = 0 ORDER BY id ASC;"
            ))?;
            let drivers = stmt
                .query_map([], driver_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(drivers)
        })
    }

    fn update(&self, driver: &Driver) -> StoreResult<Driver> {
        observe("driver_update", || {
            driver.validate()?;
            let conn = self.provider.acquire()?;
            let changed = conn.execute(
                "UPDATE drivers
                 SET
                    name = ?1,
                    license_number = ?2,
                    login = ?3,
                    password = ?4
                 WHERE id = ?5
                   AND is_deleted = 0;",
                params![
                    driver.name,
                    driver.license_number,
                    driver.login,
                    driver.password,
                    driver.id
                ],
            )?;
            if changed == 0 {
                debug!(
                    "event=driver_update module=repo status=skipped id={} reason=not_active",
                    driver.id
                );
            }
            Ok(driver.clone())
        })
    }

    fn delete(&self, id: DriverId) -> StoreResult<bool> {
        observe("driver_delete", || {
            let conn = self.provider.acquire()?;
            let changed = conn.execute(
                "UPDATE drivers SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0;",
                [id],
            )?;
            Ok(changed > 0)
        })
    }

    fn find_by_login(&self, login: &str) -> StoreResult<Option<Driver>> {
        observe("driver_find_by_login", || {
            let conn = self.provider.acquire()?;
            let driver = conn
                .query_row(
                    &format!("{DRIVER_SELECT_SQL} WHERE login = ?1 AND is_deleted = 0;"),
                    [login],
                    driver_from_row,
                )
                .optional()?;
            Ok(driver)
        })
    }
}

/// Maps a row exposing `id, name, license_number, login, password`.
pub(crate) fn driver_from_row(row: &Row<'_>) -> rusqlite::Result<Driver> {
    Ok(Driver {
        id: row.get("id")?,
        name: row.get("name")?,
        license_number: row.get("license_number")?,
        login: row.get("login")?,
        password: row.get("password")?,
    })
}
