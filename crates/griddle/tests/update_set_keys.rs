use griddle::{CreatePolicy, Database, Query, Record};
use griddle_driver_sqlite::Sqlite;

#[derive(Record, Debug, Clone, PartialEq)]
#[table("things")]
struct Thing {
    id: i64,
    name: String,
    integer: i64,
}

fn setup() -> Database {
    let mut db = Database::connect(&Sqlite::in_memory()).unwrap();
    db.create_table::<Thing>(CreatePolicy::new()).unwrap();
    db
}

fn thing(id: i64, name: &str, integer: i64) -> Thing {
    Thing {
        id,
        name: name.to_owned(),
        integer,
    }
}

fn load(db: &mut Database, id: i64) -> Thing {
    Query::<Thing>::table()
        .filter(Thing::fields().id().eq(id))
        .first(db)
        .unwrap()
        .unwrap()
}

#[test]
fn set_keys_limits_assignments() {
    let mut db = setup();
    Query::<Thing>::table()
        .insert(&mut db, &[thing(2000, "N", 40)])
        .unwrap();

    Query::<Thing>::table()
        .filter(Thing::fields().id().eq(2000i64))
        .update(&thing(2000, "N2", 41))
        .set(Thing::fields().name())
        .exec(&mut db)
        .unwrap();

    let updated = load(&mut db, 2000);
    assert_eq!(updated.name, "N2");
    assert_eq!(updated.integer, 40);
}

#[test]
fn default_update_assigns_everything_but_the_key() {
    let mut db = setup();
    Query::<Thing>::table()
        .insert(&mut db, &[thing(1, "old", 5)])
        .unwrap();

    Query::<Thing>::table()
        .filter(Thing::fields().id().eq(1i64))
        .update(&thing(1, "new", 6))
        .exec(&mut db)
        .unwrap();

    assert_eq!(load(&mut db, 1), thing(1, "new", 6));
}

#[test]
fn ignore_keys_drop_from_default_set() {
    let mut db = setup();
    Query::<Thing>::table()
        .insert(&mut db, &[thing(1, "old", 5)])
        .unwrap();

    Query::<Thing>::table()
        .filter(Thing::fields().id().eq(1i64))
        .update(&thing(1, "new", 99))
        .ignore(Thing::fields().integer())
        .exec(&mut db)
        .unwrap();

    let updated = load(&mut db, 1);
    assert_eq!(updated.name, "new");
    assert_eq!(updated.integer, 5);
}

#[test]
fn update_without_filter_touches_every_row() {
    let mut db = setup();
    Query::<Thing>::table()
        .insert(&mut db, &[thing(1, "a", 0), thing(2, "b", 0)])
        .unwrap();

    let affected = Query::<Thing>::table()
        .update(&thing(0, "same", 7))
        .set(Thing::fields().name())
        .exec(&mut db)
        .unwrap();
    assert_eq!(affected, 2);

    assert_eq!(load(&mut db, 1).name, "same");
    assert_eq!(load(&mut db, 2).name, "same");
    assert_eq!(load(&mut db, 1).integer, 0);
}

#[test]
fn update_with_only_key_columns_is_noop() {
    let mut db = setup();
    Query::<Thing>::table()
        .insert(&mut db, &[thing(1, "a", 0)])
        .unwrap();

    // `id` is the primary key, so the SET list comes out empty.
    let affected = Query::<Thing>::table()
        .filter(Thing::fields().id().eq(1i64))
        .update(&thing(9, "z", 9))
        .set(Thing::fields().id())
        .exec(&mut db)
        .unwrap();

    assert_eq!(affected, 0);
    assert_eq!(load(&mut db, 1), thing(1, "a", 0));
}
