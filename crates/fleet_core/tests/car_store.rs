use fleet_core::{
    Car, CarStore, ConnectionProvider, Driver, DriverStore, Manufacturer, ManufacturerStore,
    NewCar, NewDriver, NewManufacturer, SqliteCarStore, SqliteDriverStore,
    SqliteManufacturerStore, StoreError,
};
use std::collections::BTreeSet;

struct Fixture {
    provider: ConnectionProvider,
    cars: SqliteCarStore,
    drivers: SqliteDriverStore,
    toyota: Manufacturer,
}

impl Fixture {
    fn new() -> Self {
        let provider = ConnectionProvider::in_memory().unwrap();
        let manufacturers = SqliteManufacturerStore::new(provider.clone());
        let toyota = manufacturers
            .create(NewManufacturer::new("Toyota", "Japan"))
            .unwrap();
        Self {
            cars: SqliteCarStore::new(provider.clone()),
            drivers: SqliteDriverStore::new(provider.clone()),
            provider,
            toyota,
        }
    }

    fn driver(&self, login: &str) -> Driver {
        self.drivers
            .create(NewDriver::new(format!("Driver {login}"), "LIC", login, "pw"))
            .unwrap()
    }

    fn car(&self, model: &str, drivers: &[&Driver]) -> Car {
        let mut draft = NewCar::new(model, self.toyota.clone());
        draft.drivers = drivers.iter().map(|d| (*d).clone()).collect();
        self.cars.create(draft).unwrap()
    }

    fn association_rows(&self, car: &Car) -> i64 {
        self.provider
            .acquire()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM cars_drivers WHERE car_id = ?1;",
                [car.id],
                |row| row.get(0),
            )
            .unwrap()
    }
}

fn ids(car: &Car) -> BTreeSet<i64> {
    car.driver_ids()
}

#[test]
fn create_without_drivers_roundtrips() {
    let fx = Fixture::new();
    let draft = NewCar::new("Camry", fx.toyota.clone());

    let created = fx.cars.create(draft.clone()).unwrap();
    let loaded = fx.cars.get(created.id).unwrap().unwrap();

    assert_eq!(loaded, draft.with_id(created.id));
    assert_eq!(fx.association_rows(&loaded), 0);
}

#[test]
fn create_with_drivers_writes_one_row_per_distinct_driver() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let b = fx.driver("b");

    let car = fx.car("Camry", &[&a, &b, &a]);

    assert_eq!(fx.association_rows(&car), 2);
    assert_eq!(car.drivers, vec![a.clone(), b.clone()]);
    let loaded = fx.cars.get(car.id).unwrap().unwrap();
    assert_eq!(loaded, car);
    assert_eq!(loaded.manufacturer, fx.toyota);
}

#[test]
fn create_and_update_return_drivers_as_persisted() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let retired = fx.driver("retired");
    fx.drivers.delete(retired.id).unwrap();

    let created = fx.car("Camry", &[&a, &a, &retired]);
    assert_eq!(created.drivers, vec![a.clone()]);
    assert_eq!(fx.cars.get(created.id).unwrap().unwrap(), created);

    let mut edited = created.clone();
    edited.drivers = vec![retired.clone(), a.clone(), a.clone()];
    let updated = fx.cars.update(&edited).unwrap();
    assert_eq!(updated.drivers, vec![a.clone()]);
    assert_eq!(fx.cars.get(created.id).unwrap().unwrap(), updated);
}

#[test]
fn update_replaces_driver_set_regardless_of_previous() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let b = fx.driver("b");
    let c = fx.driver("c");
    let mut car = fx.car("Camry", &[&a, &b]);

    car.drivers = vec![b.clone(), c.clone()];
    car.model = "Camry Hybrid".to_string();
    fx.cars.update(&car).unwrap();

    let loaded = fx.cars.get(car.id).unwrap().unwrap();
    assert_eq!(loaded.model, "Camry Hybrid");
    assert_eq!(ids(&loaded), BTreeSet::from([b.id, c.id]));

    car.drivers.clear();
    fx.cars.update(&car).unwrap();
    assert!(fx.cars.get(car.id).unwrap().unwrap().drivers.is_empty());
    assert_eq!(fx.association_rows(&car), 0);
}

#[test]
fn repeated_rewrites_do_not_accumulate_rows() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let car = fx.car("Camry", &[&a]);

    for _ in 0..3 {
        fx.cars.update(&car).unwrap();
    }

    assert_eq!(fx.association_rows(&car), 1);
}

#[test]
fn update_with_unknown_driver_rolls_back_everything() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let mut car = fx.car("Camry", &[&a]);

    let mut ghost = a.clone();
    ghost.id = 9_999;
    car.model = "Corolla".to_string();
    car.drivers = vec![ghost];
    let err = fx.cars.update(&car).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));

    let loaded = fx.cars.get(car.id).unwrap().unwrap();
    assert_eq!(loaded.model, "Camry");
    assert_eq!(ids(&loaded), BTreeSet::from([a.id]));
}

#[test]
fn create_with_unknown_manufacturer_fails_without_rows() {
    let fx = Fixture::new();
    let mut ghost = fx.toyota.clone();
    ghost.id = 777;

    let err = fx.cars.create(NewCar::new("Phantom", ghost)).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert!(fx.cars.get_all().unwrap().is_empty());
}

#[test]
fn soft_deleted_driver_disappears_from_car() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let b = fx.driver("b");
    let car = fx.car("Camry", &[&a, &b]);

    fx.drivers.delete(a.id).unwrap();

    let loaded = fx.cars.get(car.id).unwrap().unwrap();
    assert_eq!(ids(&loaded), BTreeSet::from([b.id]));
    // The join row is still there; only the read filters it.
    assert_eq!(fx.association_rows(&car), 2);
}

#[test]
fn delete_is_soft_and_keeps_association_rows() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let car = fx.car("Camry", &[&a]);

    assert!(fx.cars.delete(car.id).unwrap());
    assert!(fx.cars.get(car.id).unwrap().is_none());
    assert!(!fx.cars.delete(car.id).unwrap());
    assert_eq!(fx.association_rows(&car), 1);
}

#[test]
fn update_of_deleted_car_changes_nothing() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let b = fx.driver("b");
    let mut car = fx.car("Camry", &[&a]);
    fx.cars.delete(car.id).unwrap();

    car.model = "Resurrected".to_string();
    car.drivers = vec![b.clone(), b];
    let returned = fx.cars.update(&car).unwrap();
    assert_eq!(returned.drivers.len(), 1);

    let conn = fx.provider.acquire().unwrap();
    let model: String = conn
        .query_row("SELECT model FROM cars WHERE id = ?1;", [car.id], |row| {
            row.get(0)
        })
        .unwrap();
    let driver_id: i64 = conn
        .query_row(
            "SELECT driver_id FROM cars_drivers WHERE car_id = ?1;",
            [car.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(model, "Camry");
    assert_eq!(driver_id, a.id);
}

#[test]
fn get_all_returns_active_cars_with_drivers() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let camry = fx.car("Camry", &[&a]);
    let corolla = fx.car("Corolla", &[]);
    let prius = fx.car("Prius", &[&a]);
    fx.cars.delete(corolla.id).unwrap();

    let all = fx.cars.get_all().unwrap();
    assert_eq!(
        all.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![camry.id, prius.id]
    );
    assert!(all.iter().all(|c| ids(c) == BTreeSet::from([a.id])));
}

#[test]
fn get_all_by_driver_matches_current_assignment() {
    let fx = Fixture::new();
    let a = fx.driver("a");
    let b = fx.driver("b");
    let camry = fx.car("Camry", &[&a, &b]);
    let corolla = fx.car("Corolla", &[&b]);
    let mut prius = fx.car("Prius", &[&a]);
    let retired = fx.car("Supra", &[&a]);
    fx.cars.delete(retired.id).unwrap();

    prius.drivers.clear();
    fx.cars.update(&prius).unwrap();

    let for_a = fx.cars.get_all_by_driver(a.id).unwrap();
    assert_eq!(
        for_a.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![camry.id]
    );
    assert_eq!(ids(&for_a[0]), BTreeSet::from([a.id, b.id]));

    let for_b = fx.cars.get_all_by_driver(b.id).unwrap();
    assert_eq!(
        for_b.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![camry.id, corolla.id]
    );

    fx.drivers.delete(b.id).unwrap();
    assert!(fx.cars.get_all_by_driver(b.id).unwrap().is_empty());
}

#[test]
fn retired_manufacturer_still_shows_on_car() {
    let fx = Fixture::new();
    let car = fx.car("Camry", &[]);
    SqliteManufacturerStore::new(fx.provider.clone())
        .delete(fx.toyota.id)
        .unwrap();

    let loaded = fx.cars.get(car.id).unwrap().unwrap();
    assert_eq!(loaded.manufacturer, fx.toyota);
}

#[test]
fn blank_model_is_rejected() {
    let fx = Fixture::new();
    let err = fx
        .cars
        .create(NewCar::new("   ", fx.toyota.clone()))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn file_backed_store_sees_writes_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ConnectionProvider::file(dir.path().join("fleet.db")).unwrap();
    let toyota = SqliteManufacturerStore::new(provider.clone())
        .create(NewManufacturer::new("Toyota", "Japan"))
        .unwrap();
    let driver = SqliteDriverStore::new(provider.clone())
        .create(NewDriver::new("A. Smith", "LIC1", "asmith", "pw"))
        .unwrap();
    let cars = SqliteCarStore::new(provider);

    let mut draft = NewCar::new("Camry", toyota);
    draft.drivers.push(driver.clone());
    let car = cars.create(draft).unwrap();

    assert_eq!(
        cars.get(car.id).unwrap().unwrap().drivers,
        vec![driver]
    );
}
