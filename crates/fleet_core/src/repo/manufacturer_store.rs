//! Manufacturer store contract and SQLite implementation.

use crate::db::ConnectionProvider;
use crate::model::manufacturer::{Manufacturer, ManufacturerId, NewManufacturer};
use crate::repo::{observe, StoreResult};
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

const MANUFACTURER_SELECT_SQL: &str = "SELECT
    id,
    name,
    country
FROM manufacturers";

/// CRUD over active manufacturers.
pub trait ManufacturerStore {
    /// Inserts `manufacturer` and returns it with its generated id.
    fn create(&self, manufacturer: NewManufacturer) -> StoreResult<Manufacturer>;
    fn get(&self, id: ManufacturerId) -> StoreResult<Option<Manufacturer>>;
    /// All active manufacturers, ordered by id.
    fn get_all(&self) -> StoreResult<Vec<Manufacturer>>;
    /// Full-record update. Silently leaves soft-deleted rows untouched.
    fn update(&self, manufacturer: &Manufacturer) -> StoreResult<Manufacturer>;
    /// Soft-deletes; `false` when no active row matched.
    fn delete(&self, id: ManufacturerId) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct SqliteManufacturerStore {
    provider: ConnectionProvider,
}

impl SqliteManufacturerStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

impl ManufacturerStore for SqliteManufacturerStore {
    fn create(&self, manufacturer: NewManufacturer) -> StoreResult<Manufacturer> {
        observe("manufacturer_create", || {
            manufacturer.validate()?;
            let conn = self.provider.acquire()?;
            conn.execute(
                "INSERT INTO manufacturers (name, country) VALUES (?1, ?2);",
                params![manufacturer.name, manufacturer.country],
            )?;
            Ok(manufacturer.with_id(conn.last_insert_rowid()))
        })
    }

    fn get(&self, id: ManufacturerId) -> StoreResult<Option<Manufacturer>> {
        observe("manufacturer_get", || {
            let conn = self.provider.acquire()?;
            let manufacturer = conn
                .query_row(
                    &format!("{MANUFACTURER_SELECT_SQL} WHERE id = ?1 AND is_deleted = 0;"),
                    [id],
                    manufacturer_from_row,
                )
                .optional()?;
            Ok(manufacturer)
        })
    }

    fn get_all(&self) -> StoreResult<Vec<Manufacturer>> {
        observe("manufacturer_get_all", || {
            let conn = self.provider.acquire()?;
            let mut stmt = conn.prepare(&format!(
                "{MANUFACTURER_SELECT_SQL} WHERE is_deleted = 0 ORDER BY id ASC;"
            ))?;
            let manufacturers = stmt
                .query_map([], manufacturer_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(manufacturers)
        })
    }

    fn update(&self, manufacturer: &Manufacturer) -> StoreResult<Manufacturer> {
        observe("manufacturer_update", || {
            manufacturer.validate()?;
            let conn = self.provider.acquire()?;
            let changed = conn.execute(
                "UPDATE manufacturers
                 SET
                    name = ?1,
                    country = ?2
                 WHERE id = ?3
                   AND is_deleted = 0;",
                params![manufacturer.name, manufacturer.country, manufacturer.id],
            )?;
            if changed == 0 {
                debug!(
                    "event=manufacturer_update module=repo status=skipped id={} reason=not_active",
                    manufacturer.id
                );
            }
            Ok(manufacturer.clone())
        })
    }

    fn delete(&self, id: ManufacturerId) -> StoreResult<bool> {
        observe("manufacturer_delete", || {
            let conn = self.provider.acquire()?;
            let changed = conn.execute(
                "UPDATE manufacturers SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0;",
                [id],
            )?;
            Ok(changed > 0)
        })
    }
}

fn manufacturer_from_row(row: &Row<'_>) -> rusqlite::Result<Manufacturer> {
    Ok(Manufacturer {
        id: row.get("id")?,
        name: row.get("name")?,
        country: row.get("country")?,
    })
}
