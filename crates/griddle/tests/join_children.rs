use griddle::{CreatePolicy, Database, HasMany, Query, QueryError, Record, SqlGenError};
use griddle_driver_sqlite::Sqlite;

#[derive(Record, Debug, Clone, PartialEq)]
#[table("parents")]
struct Parent {
    id: i64,
    #[column("last_name")]
    last: String,
    children: HasMany<Child>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[table("children")]
struct Child {
    id: i64,
    parent_id: i64,
    code: i64,
    toys: HasMany<Toy>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[table("toys")]
struct Toy {
    id: i64,
    child_id: i64,
    label: String,
}

fn setup() -> Database {
    let mut db = Database::connect(&Sqlite::in_memory()).unwrap();
    // Creating the root recurses through the child collections.
    db.create_table::<Parent>(CreatePolicy::new()).unwrap();
    db
}

fn parent(id: i64, last: &str) -> Parent {
    Parent {
        id,
        last: last.to_owned(),
        children: HasMany::default(),
    }
}

fn child(id: i64, parent_id: i64, code: i64) -> Child {
    Child {
        id,
        parent_id,
        code,
        toys: HasMany::default(),
    }
}

fn toy(id: i64, child_id: i64, label: &str) -> Toy {
    Toy {
        id,
        child_id,
        label: label.to_owned(),
    }
}

fn seed(db: &mut Database) {
    Query::<Parent>::table()
        .insert(db, &[parent(1, "Lars"), parent(2, "Anders")])
        .unwrap();
    Query::<Child>::table()
        .insert(
            db,
            &[
                child(10, 1, 12),
                child(11, 1, 7),
                child(12, 1, 15),
                child(13, 2, 12),
            ],
        )
        .unwrap();
}

#[test]
fn join_with_per_side_ordering_and_predicates() {
    let mut db = setup();
    seed(&mut db);

    let rows = Query::<Parent>::table()
        .order(Parent::fields().last().asc())
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .order(Child::fields().code().desc())
        .filter(
            Parent::fields()
                .last()
                .eq("Lars")
                .and(Child::fields().code().ne(7i64)),
        )
        .select(&mut db)
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].last, "Lars");

    let codes: Vec<i64> = rows[0]
        .children
        .get()
        .expect("children joined")
        .iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, vec![15, 12]);
}

#[test]
fn join_constrains_children_not_parents() {
    let mut db = setup();
    seed(&mut db);

    // Joins never narrow the principal result set.
    let rows = Query::<Parent>::table()
        .order(Parent::fields().id().asc())
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .filter(Child::fields().code().eq(12i64))
        .select(&mut db)
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].children.get().unwrap().len(), 1);
    assert_eq!(rows[1].children.get().unwrap().len(), 1);
}

#[test]
fn unjoined_field_is_absent_joined_empty_set_is_empty() {
    let mut db = setup();
    Query::<Parent>::table()
        .insert(&mut db, &[parent(1, "Lars")])
        .unwrap();

    let plain = Query::<Parent>::table().select(&mut db).unwrap();
    assert!(plain[0].children.get().is_none());

    let joined = Query::<Parent>::table()
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .select(&mut db)
        .unwrap();
    assert_eq!(joined[0].children.get(), Some(&[][..]));
}

#[test]
fn limit_zero_skips_child_load() {
    let mut db = setup();
    seed(&mut db);

    let rows = Query::<Parent>::table()
        .limit(0)
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .select(&mut db)
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn per_join_limit_applies_to_children() {
    let mut db = setup();
    seed(&mut db);

    let rows = Query::<Parent>::table()
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .order(Child::fields().code().asc())
        .limit(2)
        .filter(Parent::fields().last().eq("Lars"))
        .select(&mut db)
        .unwrap();

    let codes: Vec<i64> = rows[0]
        .children
        .get()
        .unwrap()
        .iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, vec![7, 12]);
}

#[test]
fn nested_join_populates_grandchildren() {
    let mut db = setup();
    seed(&mut db);
    Query::<Toy>::table()
        .insert(
            &mut db,
            &[toy(100, 10, "kite"), toy(101, 10, "ball"), toy(102, 11, "top")],
        )
        .unwrap();

    let rows = Query::<Parent>::table()
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .join(
            Child::fields().toys(),
            Child::fields().id(),
            Toy::fields().child_id(),
        )
        .filter(Parent::fields().id().eq(1i64))
        .select(&mut db)
        .unwrap();

    let children = rows[0].children.get().unwrap();
    for c in children {
        let toys = c.toys.get().expect("nested join loaded");
        match c.id {
            10 => assert_eq!(toys.len(), 2),
            11 => assert_eq!(toys.len(), 1),
            _ => assert!(toys.is_empty()),
        }
    }
}

#[test]
fn duplicate_join_is_rejected() {
    let mut db = setup();

    let err = Query::<Parent>::table()
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .select(&mut db)
        .unwrap_err();

    assert_eq!(
        err.as_query(),
        Some(&QueryError::DuplicateJoin { field: "children" })
    );
}

#[test]
fn predicate_on_unjoined_form_fails_before_execution() {
    let mut db = setup();
    seed(&mut db);

    let err = Query::<Parent>::table()
        .filter(Child::fields().code().eq(12i64))
        .select(&mut db)
        .unwrap_err();

    assert_eq!(
        err.as_sql_gen(),
        Some(&SqlGenError::UnknownForm {
            form: "Child".to_owned()
        })
    );
}

#[test]
fn cross_form_conjunct_is_rejected() {
    let mut db = setup();
    seed(&mut db);

    let err = Query::<Parent>::table()
        .join(
            Parent::fields().children(),
            Parent::fields().id(),
            Child::fields().parent_id(),
        )
        .filter(
            Parent::fields()
                .last()
                .eq("Lars")
                .or(Child::fields().code().eq(12i64)),
        )
        .select(&mut db)
        .unwrap_err();

    assert_eq!(err.as_sql_gen(), Some(&SqlGenError::CrossFormPredicate));
}
