use taller_core::{
    Address, Database, Mechanic, RepoError, Role, ServiceRequest, SqliteAddressRepository,
    SqliteMechanicRepository, SqliteServiceRequestRepository, SqliteUserRepository, User,
    UserRepository,
};

#[test]
fn insert_assigns_id_when_unsaved_and_honors_supplied_id() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let auto_id = addresses
        .insert(&Address::new(1, "Casa", "Av. Arequipa 100", "Lima", "Lima"))
        .unwrap();
    assert!(auto_id > 0);

    let mut fixed = Address::new(1, "Trabajo", "Jr. Union 45", "Lima", "Lima");
    fixed.id = 42;
    let fixed_id = addresses.insert(&fixed).unwrap();
    assert_eq!(fixed_id, 42);
    assert!(addresses.get_by_id(42).unwrap().is_some());
}

#[test]
fn duplicate_email_aborts_and_leaves_count_unchanged() {
    let db = Database::open_in_memory().unwrap();
    let users = SqliteUserRepository::new(&db);

    users
        .create_user(&User::new("Eva", "eva@taller.com", "911", "pw"))
        .unwrap();
    let before = users.count_users().unwrap();

    let err = users
        .create_user(&User::new("Impostor", "eva@taller.com", "922", "pw2"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert_eq!(users.count_users().unwrap(), before);
}

#[test]
fn address_insert_replaces_on_supplied_id_conflict() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let mut home = Address::new(1, "Casa", "Av. Arequipa 100", "Lima", "Lima");
    home.id = 7;
    addresses.insert(&home).unwrap();

    home.name = "Casa nueva".to_string();
    addresses.insert(&home).unwrap();

    assert_eq!(addresses.count().unwrap(), 1);
    let stored = addresses.get_by_id(7).unwrap().unwrap();
    assert_eq!(stored.name, "Casa nueva");
}

#[test]
fn update_missing_id_reports_not_found() {
    let db = Database::open_in_memory().unwrap();
    let addresses = SqliteAddressRepository::new(&db);

    let mut ghost = Address::new(1, "Nada", "Calle Falsa 123", "Lima", "Lima");
    ghost.id = 9999;
    let err = addresses.update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            table: "addresses",
            id: 9999
        }
    ));
}

#[test]
fn update_replaces_whole_record() {
    let db = Database::open_in_memory().unwrap();
    let users = SqliteUserRepository::new(&db);

    let mut eva = User::new("Eva", "eva@taller.com", "911", "pw");
    eva.id = users.create_user(&eva).unwrap();

    eva.phone = "933444555".to_string();
    eva.role = Role::Mechanic;
    users.update_user(&eva).unwrap();

    let stored = users.get_user(eva.id).unwrap().unwrap();
    assert_eq!(stored.phone, "933444555");
    assert_eq!(stored.role, Role::Mechanic);
}

#[test]
fn delete_missing_id_is_a_successful_noop() {
    let db = Database::open_in_memory().unwrap();
    let vehicles = taller_core::SqliteVehicleRepository::new(&db);

    vehicles.delete_by_id(123456).unwrap();
    vehicles.delete_by_id(123456).unwrap();
    assert_eq!(vehicles.count().unwrap(), 0);
}

#[test]
fn delete_user_leaves_owned_rows_behind() {
    let db = Database::open_in_memory().unwrap();
    let users = SqliteUserRepository::new(&db);
    let addresses = SqliteAddressRepository::new(&db);

    let owner = users
        .create_user(&User::new("Eva", "eva@taller.com", "911", "pw"))
        .unwrap();
    addresses
        .insert(&Address::new(owner, "Casa", "Av. Arequipa 100", "Lima", "Lima"))
        .unwrap();

    users.delete_user(owner).unwrap();

    // No cascade: the address row survives with a dangling user_id.
    assert!(users.get_user(owner).unwrap().is_none());
    assert_eq!(addresses.list_for_user(owner).unwrap().len(), 1);
}

#[test]
fn mechanic_upsert_requires_catalog_id() {
    let db = Database::open_in_memory().unwrap();
    let mechanics = SqliteMechanicRepository::new(&db);

    let unassigned = sample_mechanic(0);
    let err = mechanics.upsert(&unassigned).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn mechanic_upsert_is_idempotent_by_id() {
    let db = Database::open_in_memory().unwrap();
    let mechanics = SqliteMechanicRepository::new(&db);
    let seeded = mechanics.count().unwrap();

    let mut nico = sample_mechanic(50);
    mechanics.upsert(&nico).unwrap();

    nico.specialty = "Cajas automaticas".to_string();
    nico.rating = 4.2;
    mechanics.upsert(&nico).unwrap();

    assert_eq!(mechanics.count().unwrap(), seeded + 1);
    let stored = mechanics.get_by_id(50).unwrap().unwrap();
    assert_eq!(stored.specialty, "Cajas automaticas");
}

#[test]
fn mechanic_availability_filter_and_toggle() {
    let db = Database::open_in_memory().unwrap();
    let mechanics = SqliteMechanicRepository::new(&db);

    let available_before = mechanics.list_available().unwrap();
    assert!(available_before.iter().all(|mechanic| mechanic.is_available));

    let first = available_before[0].id;
    mechanics.set_availability(first, false).unwrap();

    let available_after = mechanics.list_available().unwrap();
    assert_eq!(available_after.len(), available_before.len() - 1);
    assert!(available_after.iter().all(|mechanic| mechanic.id != first));

    let err = mechanics.set_availability(987654, true).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn service_requests_list_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let requests = SqliteServiceRequestRepository::new(&db);

    let mut first = ServiceRequest::new("bateria", "Av. Brasil 500");
    first.user_id = Some(2);
    first.timestamp = 1_000;
    let mut second = ServiceRequest::new("grua", "Av. Brasil 500");
    second.user_id = Some(2);
    second.timestamp = 3_000;
    second.needs_tow = true;
    let mut third = ServiceRequest::new("mecanica general", "Jr. Cusco 12");
    third.user_id = Some(9);
    third.timestamp = 2_000;

    requests.insert(&first).unwrap();
    requests.insert(&second).unwrap();
    requests.insert(&third).unwrap();

    let recent = requests.list_recent().unwrap();
    let stamps: Vec<i64> = recent.iter().map(|request| request.timestamp).collect();
    assert_eq!(stamps, vec![3_000, 2_000, 1_000]);

    let mine = requests.list_for_user(2).unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine[0].needs_tow);
}

#[test]
fn anonymous_request_round_trips_without_requester() {
    let db = Database::open_in_memory().unwrap();
    let requests = SqliteServiceRequestRepository::new(&db);

    let id = requests
        .insert(&ServiceRequest::new("pinchazo", "Panamericana Sur km 30"))
        .unwrap();
    let stored = requests.get_by_id(id).unwrap().unwrap();
    assert!(stored.user_id.is_none());
    assert!(stored.description.is_none());
    assert!(!stored.urgent);
}

#[test]
fn generic_store_supports_whole_record_delete() {
    let db = Database::open_in_memory().unwrap();
    let store: taller_core::Store<'_, taller_core::Vehicle> = taller_core::Store::new(&db);

    let mut yaris = taller_core::Vehicle::new(3, "Toyota", "Yaris", 2012, "ABC-123", "rojo");
    yaris.id = store.insert(&yaris).unwrap();
    assert_eq!(store.count().unwrap(), 1);

    store.delete(&yaris).unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.get_by_id(yaris.id).unwrap().is_none());
}

fn sample_mechanic(id: i64) -> Mechanic {
    Mechanic {
        id,
        name: "Nico Salas".to_string(),
        specialty: "Suspension".to_string(),
        rating: 4.5,
        distance: "5.0 km".to_string(),
        phone: "955666777".to_string(),
        is_available: true,
        address: "Av. Colonial 900".to_string(),
        experience: 9,
        price_per_hour: 75.0,
        profile_image: None,
    }
}
