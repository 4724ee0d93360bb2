use griddle::{CreatePolicy, Database, Query, Record};
use griddle_driver_sqlite::Sqlite;

#[derive(Record, Debug, Clone, PartialEq)]
#[table("pairs")]
struct Pair {
    id: i64,
    a: i64,
    b: i64,
}

fn setup() -> Database {
    let mut db = Database::connect(&Sqlite::in_memory()).unwrap();
    db.create_table::<Pair>(CreatePolicy::new()).unwrap();

    let rows: Vec<Pair> = (0..4)
        .flat_map(|a| (0..4).map(move |b| Pair { id: a * 4 + b, a, b }))
        .collect();
    Query::<Pair>::table().insert(&mut db, &rows).unwrap();
    db
}

fn ids(db: &mut Database, filter: griddle::stmt::Expr) -> Vec<i64> {
    Query::<Pair>::table()
        .order(Pair::fields().id().asc())
        .filter(filter)
        .select(db)
        .unwrap()
        .iter()
        .map(|pair| pair.id)
        .collect()
}

#[test]
fn de_morgan_conjunction() {
    let mut db = setup();

    let lhs = !(Pair::fields().a().eq(1i64) & Pair::fields().b().eq(2i64));
    let rhs = !Pair::fields().a().eq(1i64) | !Pair::fields().b().eq(2i64);

    let lhs_ids = ids(&mut db, lhs);
    let rhs_ids = ids(&mut db, rhs);
    assert_eq!(lhs_ids, rhs_ids);
    assert_eq!(lhs_ids.len(), 15);
}

#[test]
fn de_morgan_disjunction() {
    let mut db = setup();

    let lhs = !(Pair::fields().a().eq(0i64) | Pair::fields().b().eq(0i64));
    let rhs = !Pair::fields().a().eq(0i64) & !Pair::fields().b().eq(0i64);

    assert_eq!(ids(&mut db, lhs), ids(&mut db, rhs));
}

#[test]
fn comparison_operators() {
    let mut db = setup();

    assert_eq!(
        ids(&mut db, Pair::fields().a().lt(1i64)).len(),
        4
    );
    assert_eq!(
        ids(&mut db, Pair::fields().a().le(1i64)).len(),
        8
    );
    assert_eq!(
        ids(&mut db, Pair::fields().a().gt(2i64)).len(),
        4
    );
    assert_eq!(
        ids(&mut db, Pair::fields().a().ge(2i64)).len(),
        8
    );
    assert_eq!(
        ids(&mut db, Pair::fields().a().ne(0i64)).len(),
        12
    );
}

#[test]
fn operator_sugar_matches_methods() {
    let mut db = setup();

    let sugared = Pair::fields().a().eq(1i64) & Pair::fields().b().ge(2i64);
    let spelled = Pair::fields()
        .a()
        .eq(1i64)
        .and(Pair::fields().b().ge(2i64));

    assert_eq!(ids(&mut db, sugared), ids(&mut db, spelled));
}
