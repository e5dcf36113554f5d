use std::sync::Arc;
use std::thread;

use taller_core::{
    Address, Database, RepoError, SqliteAddressRepository, SqliteVehicleRepository, Vehicle,
};

#[test]
fn set_as_default_leaves_exactly_one_default() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let casa = addresses.insert(&sample_address(1, "Casa")).unwrap();
    let trabajo = addresses.insert(&sample_address(1, "Trabajo")).unwrap();
    let taller = addresses.insert(&sample_address(1, "Taller")).unwrap();

    addresses.set_as_default(1, casa).unwrap();
    addresses.set_as_default(1, trabajo).unwrap();
    addresses.set_as_default(1, taller).unwrap();

    let listed = addresses.list_for_user(1).unwrap();
    let defaults: Vec<i64> = listed
        .iter()
        .filter(|address| address.is_default)
        .map(|address| address.id)
        .collect();
    assert_eq!(defaults, vec![taller]);
}

#[test]
fn set_as_default_rejects_foreign_record_and_mutates_nothing() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let mine = addresses.insert(&sample_address(1, "Casa")).unwrap();
    let theirs = addresses.insert(&sample_address(2, "Ajena")).unwrap();
    addresses.set_as_default(1, mine).unwrap();

    let err = addresses.set_as_default(1, theirs).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Flags for both owners are exactly as before the failed call.
    assert_eq!(addresses.get_default(1).unwrap().unwrap().id, mine);
    assert!(addresses.get_default(2).unwrap().is_none());
}

#[test]
fn set_as_default_on_missing_record_reports_not_found() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let err = addresses.set_as_default(1, 404).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            table: "addresses",
            id: 404
        }
    ));
}

#[test]
fn get_default_is_absent_for_empty_owner_and_after_clear() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    assert!(addresses.get_default(77).unwrap().is_none());

    let casa = addresses.insert(&sample_address(77, "Casa")).unwrap();
    // No explicit choice yet: records exist, none is default.
    assert!(addresses.get_default(77).unwrap().is_none());

    addresses.set_as_default(77, casa).unwrap();
    assert!(addresses.get_default(77).unwrap().is_some());

    addresses.clear_default_for_user(77).unwrap();
    assert!(addresses.get_default(77).unwrap().is_none());
    assert_eq!(addresses.list_for_user(77).unwrap().len(), 1);
}

#[test]
fn list_orders_default_first_then_newest() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let mut a = sample_address(5, "A");
    a.created_at = 10;
    let mut b = sample_address(5, "B");
    b.created_at = 20;
    b.is_default = true;
    let mut c = sample_address(5, "C");
    c.created_at = 30;

    addresses.insert(&a).unwrap();
    addresses.insert(&b).unwrap();
    addresses.insert(&c).unwrap();

    let names: Vec<String> = addresses
        .list_for_user(5)
        .unwrap()
        .into_iter()
        .map(|address| address.name)
        .collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[test]
fn racing_setters_for_same_owner_leave_one_winner() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let addresses = SqliteAddressRepository::new(&db);

    let x = addresses.insert(&sample_address(1, "X")).unwrap();
    let y = addresses.insert(&sample_address(1, "Y")).unwrap();

    let mut handles = Vec::new();
    for target in [x, y] {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            let addresses = SqliteAddressRepository::new(&db);
            for _ in 0..25 {
                addresses.set_as_default(1, target).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let defaults: Vec<i64> = addresses
        .list_for_user(1)
        .unwrap()
        .into_iter()
        .filter(|address| address.is_default)
        .map(|address| address.id)
        .collect();
    assert_eq!(defaults.len(), 1, "exactly one winner must remain default");
    assert!(defaults[0] == x || defaults[0] == y);
}

#[test]
fn vehicle_defaults_follow_the_same_contract() {
    let db = Database::open_in_memory().unwrap();
    let vehicles = SqliteVehicleRepository::new(&db);

    let viejo = vehicles
        .insert(&Vehicle::new(3, "Toyota", "Yaris", 2012, "ABC-123", "rojo"))
        .unwrap();
    let nuevo = vehicles
        .insert(&Vehicle::new(3, "Kia", "Rio", 2021, "XYZ-789", "gris"))
        .unwrap();

    vehicles.set_as_default(3, viejo).unwrap();
    vehicles.set_as_default(3, nuevo).unwrap();

    let listed = vehicles.list_for_user(3).unwrap();
    assert_eq!(listed[0].id, nuevo);
    assert!(listed[0].is_default);
    assert!(!listed[1].is_default);

    let err = vehicles.set_as_default(4, nuevo).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

fn sample_address(user_id: i64, name: &str) -> Address {
    Address::new(user_id, name, "Av. Siempre Viva 742", "Lima", "Lima")
}
