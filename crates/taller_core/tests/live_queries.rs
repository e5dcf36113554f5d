use taller_core::{
    Address, Database, SqliteAddressRepository, SqliteMechanicRepository, SqliteVehicleRepository,
    Vehicle,
};

#[test]
fn subscription_delivers_initial_snapshot() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    addresses.insert(&sample_address(1, "Casa")).unwrap();

    let watch = addresses.watch_for_user(1).unwrap();
    let initial = watch.try_recv().expect("initial snapshot must be queued");
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].name, "Casa");
}

#[test]
fn writes_push_fresh_snapshots_in_order() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let watch = addresses.watch_for_user(1).unwrap();
    assert_eq!(watch.try_recv().expect("initial snapshot").len(), 0);

    let casa = addresses.insert(&sample_address(1, "Casa")).unwrap();
    addresses.insert(&sample_address(1, "Trabajo")).unwrap();
    addresses.set_as_default(1, casa).unwrap();

    let after_first = watch.try_recv().expect("snapshot after first insert");
    assert_eq!(after_first.len(), 1);

    let after_second = watch.try_recv().expect("snapshot after second insert");
    assert_eq!(after_second.len(), 2);

    let after_default = watch.try_recv().expect("snapshot after default change");
    assert_eq!(after_default[0].id, casa);
    assert!(after_default[0].is_default);
}

#[test]
fn unrelated_table_writes_do_not_wake_the_watcher() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);
    let vehicles = SqliteVehicleRepository::new(&db);

    let watch = addresses.watch_for_user(1).unwrap();
    let _ = watch.try_recv();

    vehicles
        .insert(&Vehicle::new(1, "Toyota", "Yaris", 2012, "ABC-123", "rojo"))
        .unwrap();

    assert!(watch.try_recv().is_none());
}

#[test]
fn owner_scope_still_snapshots_on_any_table_write() {
    // The watch scope is the table; another owner's write re-queries and
    // re-delivers this owner's (unchanged) list.
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let watch = addresses.watch_for_user(1).unwrap();
    let _ = watch.try_recv();

    addresses.insert(&sample_address(2, "Ajena")).unwrap();
    let snapshot = watch.try_recv().expect("table write queues a snapshot");
    assert!(snapshot.is_empty());
}

#[test]
fn dropping_a_subscription_deregisters_the_watcher() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let watch = addresses.watch_for_user(1).unwrap();
    assert_eq!(db.active_watchers(), 1);

    drop(watch);
    assert_eq!(db.active_watchers(), 0);

    // Writes after cancellation must not fail or leak.
    addresses.insert(&sample_address(1, "Casa")).unwrap();
}

#[test]
fn cancel_is_equivalent_to_drop() {
    let db = Database::open_in_memory().unwrap();
    let mechanics = SqliteMechanicRepository::new(&db);

    let watch = mechanics.watch_all().unwrap();
    assert_eq!(db.active_watchers(), 1);
    watch.cancel();
    assert_eq!(db.active_watchers(), 0);
}

#[test]
fn mechanic_directory_watch_reacts_to_availability_toggles() {
    let db = Database::open_in_memory().unwrap();
    let mechanics = SqliteMechanicRepository::new(&db);

    let watch = mechanics.watch_all().unwrap();
    let initial = watch.try_recv().expect("initial directory snapshot");
    assert!(!initial.is_empty());

    let first = initial[0].id;
    mechanics.set_availability(first, false).unwrap();

    let updated = watch.try_recv().expect("snapshot after toggle");
    let toggled = updated
        .into_iter()
        .find(|mechanic| mechanic.id == first)
        .unwrap();
    assert!(!toggled.is_available);
}

fn sample_address(user_id: i64, name: &str) -> Address {
    Address::new(user_id, name, "Av. Siempre Viva 742", "Lima", "Lima")
}
