use griddle::{CreatePolicy, Database, Query, Record};
use griddle_driver_sqlite::Sqlite;

#[derive(Record, Debug, Clone, PartialEq)]
#[table("entries")]
struct Entry {
    id: i64,
    note: String,
}

/// Never created; querying it is the in-test way to provoke a driver
/// error inside a transaction body.
#[derive(Record, Debug, Clone, PartialEq)]
#[table("missing")]
struct Missing {
    id: i64,
}

fn setup() -> Database {
    let mut db = Database::connect(&Sqlite::in_memory()).unwrap();
    db.create_table::<Entry>(CreatePolicy::new()).unwrap();
    db
}

fn entry(id: i64, note: &str) -> Entry {
    Entry {
        id,
        note: note.to_owned(),
    }
}

fn count(db: &mut Database) -> u64 {
    Query::<Entry>::table().count(db).unwrap()
}

#[test]
fn commit_on_success() {
    let mut db = setup();

    let inserted = db
        .transaction(|db| Query::<Entry>::table().insert(db, &[entry(1, "kept")]))
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(count(&mut db), 1);
}

#[test]
fn rollback_on_error() {
    let mut db = setup();
    Query::<Entry>::table()
        .insert(&mut db, &[entry(1, "before")])
        .unwrap();

    let result: griddle::Result<()> = db.transaction(|db| {
        Query::<Entry>::table().insert(db, &[entry(2, "doomed")])?;
        Query::<Missing>::table().count(db)?;
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(count(&mut db), 1);
}

#[test]
fn nested_transactions_flatten() {
    let mut db = setup();

    db.transaction(|db| {
        Query::<Entry>::table().insert(db, &[entry(1, "outer")])?;
        db.transaction(|db| Query::<Entry>::table().insert(db, &[entry(2, "inner")]))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(count(&mut db), 2);
}

#[test]
fn swallowed_inner_failure_still_rolls_back() {
    let mut db = setup();

    let result = db.transaction(|db| {
        Query::<Entry>::table().insert(db, &[entry(1, "outer")])?;

        // The inner failure is caught, but it has marked the transaction.
        let inner: griddle::Result<u64> =
            db.transaction(|db| Query::<Missing>::table().count(db));
        assert!(inner.is_err());

        Ok(42)
    });

    assert_eq!(result.unwrap(), 42);
    assert_eq!(count(&mut db), 0);
}

#[test]
fn writes_after_rollback_succeed() {
    let mut db = setup();

    let _ = db.transaction(|db| Query::<Missing>::table().count(db));

    Query::<Entry>::table()
        .insert(&mut db, &[entry(1, "after")])
        .unwrap();
    assert_eq!(count(&mut db), 1);
}
