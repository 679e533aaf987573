//! Car store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist car scalar fields joined with their manufacturer.
//! - Keep `cars_drivers` in sync with the in-memory driver list.
//!
//! # Invariants
//! - Reads are two-phase: cars joined to manufacturers first, then one
//!   driver query per car. Only active drivers are attached.
//! - `create`/`update` rewrite the association inside one immediate
//!   transaction: scalar write, clear, reinsert. Any fault rolls all of it
//!   back.
//! - `update` treats the car's driver list as the complete desired set.
//! - `delete` is a soft delete; association rows of the car are kept.
//!
//! Concurrent writers to the same car are not serialized beyond SQLite's own
//! write lock; callers must keep a single writer per car.

use crate::db::ConnectionProvider;
use crate::model::car::{Car, CarId, NewCar};
use crate::model::driver::{Driver, DriverId};
use crate::model::manufacturer::Manufacturer;
use crate::repo::driver_store::driver_from_row;
use crate::repo::{observe, StoreResult};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

const CAR_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.model AS model,
    m.id AS manufacturer_id,
    m.name AS manufacturer_name,
    m.country AS manufacturer_country
FROM cars c
INNER JOIN manufacturers m ON m.id = c.manufacturer_id";

/// CRUD over active cars and their driver assignments.
pub trait CarStore {
    /// Inserts the car and one association row per distinct driver.
    ///
    /// The returned car carries the drivers as a later `get` would see them:
    /// one entry per id, active drivers only.
    fn create(&self, car: NewCar) -> StoreResult<Car>;
    fn get(&self, id: CarId) -> StoreResult<Option<Car>>;
    fn get_all(&self) -> StoreResult<Vec<Car>>;
    /// Updates scalars, then replaces all association rows with `car.drivers`.
    ///
    /// A soft-deleted or unknown car is left untouched. The returned car
    /// carries the rewritten driver set as a later `get` would see it.
    fn update(&self, car: &Car) -> StoreResult<Car>;
    fn delete(&self, id: CarId) -> StoreResult<bool>;
    /// Active cars currently assigned to the active driver `driver_id`.
    fn get_all_by_driver(&self, driver_id: DriverId) -> StoreResult<Vec<Car>>;
}

#[derive(Clone)]
pub struct SqliteCarStore {
    provider: ConnectionProvider,
}

impl SqliteCarStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

impl CarStore for SqliteCarStore {
    fn create(&self, car: NewCar) -> StoreResult<Car> {
        observe("car_create", || {
            car.validate()?;
            let mut conn = self.provider.acquire()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "INSERT INTO cars (model, manufacturer_id) VALUES (?1, ?2);",
                params![car.model, car.manufacturer.id],
            )?;
            let car_id = tx.last_insert_rowid();
            insert_drivers(&tx, car_id, &car.driver_ids())?;
            let drivers = load_drivers(&tx, car_id)?;
            tx.commit()?;

            let mut created = car.with_id(car_id);
            created.drivers = drivers;
            Ok(created)
        })
    }

    fn get(&self, id: CarId) -> StoreResult<Option<Car>> {
        observe("car_get", || {
            let conn = self.provider.acquire()?;
            let cars = load_cars(
                &conn,
                &format!("{CAR_SELECT_SQL} WHERE c.id = ?1 AND c.is_deleted = 0;"),
                [id],
            )?;
            Ok(cars.into_iter().next())
        })
    }

    fn get_all(&self) -> StoreResult<Vec<Car>> {
        observe("car_get_all", || {
            let conn = self.provider.acquire()?;
            load_cars(
                &conn,
                &format!("{CAR_SELECT_SQL} WHERE c.is_deleted = 0 ORDER BY c.id ASC;"),
                [],
            )
        })
    }

    fn update(&self, car: &Car) -> StoreResult<Car> {
        observe("car_update", || {
            car.validate()?;
            let mut conn = self.provider.acquire()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let changed = tx.execute(
                "UPDATE cars
                 SET
                    model = ?1,
                    manufacturer_id = ?2
                 WHERE id = ?3
                   AND is_deleted = 0;",
                params![car.model, car.manufacturer.id, car.id],
            )?;
            if changed == 0 {
                debug!(
                    "event=car_update module=repo status=skipped id={} reason=not_active",
                    car.id
                );
                let mut unchanged = car.clone();
                unchanged.dedup_drivers();
                return Ok(unchanged);
            }

            let cleared = tx.execute("DELETE FROM cars_drivers WHERE car_id = ?1;", [car.id])?;
            let driver_ids = car.driver_ids();
            insert_drivers(&tx, car.id, &driver_ids)?;
            let drivers = load_drivers(&tx, car.id)?;
            tx.commit()?;
            debug!(
                "event=car_drivers_rewrite module=repo status=ok id={} cleared={cleared} inserted={}",
                car.id,
                driver_ids.len()
            );
            Ok(Car {
                drivers,
                ..car.clone()
            })
        })
    }

    fn delete(&self, id: CarId) -> StoreResult<bool> {
        observe("car_delete", || {
            let conn = self.provider.acquire()?;
            let changed = conn.execute(
                "UPDATE cars SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0;",
                [id],
            )?;
            Ok(changed > 0)
        })
    }

    fn get_all_by_driver(&self, driver_id: DriverId) -> StoreResult<Vec<Car>> {
        observe("car_get_all_by_driver", || {
            let conn = self.provider.acquire()?;
            load_cars(
                &conn,
                &format!(
                    "{CAR_SELECT_SQL}
                     INNER JOIN cars_drivers cd ON cd.car_id = c.id
                     INNER JOIN drivers d ON d.id = cd.driver_id
                     WHERE cd.driver_id = ?1
                       AND c.is_deleted = 0
                       AND d.is_deleted = 0
                     ORDER BY c.id ASC;"
                ),
                [driver_id],
            )
        })
    }
}

/// Runs the scalar query, then attaches active drivers to every car found.
fn load_cars<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> StoreResult<Vec<Car>> {
    let mut stmt = conn.prepare(sql)?;
    let mut cars = stmt
        .query_map(params, car_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    for car in &mut cars {
        car.drivers = load_drivers(conn, car.id)?;
    }
    Ok(cars)
}

fn load_drivers(conn: &Connection, car_id: CarId) -> StoreResult<Vec<Driver>> {
    let mut stmt = conn.prepare_cached(
        "SELECT
            d.id AS id,
            d.name AS name,
            d.license_number AS license_number,
            d.login AS login,
            d.password AS password
         FROM cars_drivers cd
         INNER JOIN drivers d ON d.id = cd.driver_id
         WHERE cd.car_id = ?1
           AND d.is_deleted = 0
         ORDER BY d.id ASC;",
    )?;
    let drivers = stmt
        .query_map([car_id], driver_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(drivers)
}

fn insert_drivers(
    tx: &Transaction<'_>,
    car_id: CarId,
    driver_ids: &BTreeSet<DriverId>,
) -> StoreResult<()> {
    if driver_ids.is_empty() {
        return Ok(());
    }

    let mut stmt = tx.prepare("INSERT INTO cars_drivers (car_id, driver_id) VALUES (?1, ?2);")?;
    for driver_id in driver_ids {
        stmt.execute(params![car_id, driver_id])?;
    }
    Ok(())
}

fn car_from_row(row: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get("id")?,
        model: row.get("model")?,
        manufacturer: Manufacturer {
            id: row.get("manufacturer_id")?,
            name: row.get("manufacturer_name")?,
            country: row.get("manufacturer_country")?,
        },
        drivers: Vec::new(),
    })
}
