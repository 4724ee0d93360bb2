use griddle_core::driver::Capability;
use griddle_core::stmt::{BinaryOp, Value};
use griddle_sql::stmt::{Assignment, ColumnRef, Delete, Expr, Insert, Update};
use griddle_sql::{Serializer, Statement};

fn serialize(stmt: impl Into<Statement>) -> (String, Vec<Value>) {
    let mut params = vec![];
    let sql = Serializer::new(&Capability::SQLITE).serialize(&stmt.into(), &mut params);
    (sql, params)
}

fn id_filter(value: i64) -> Expr {
    Expr::BinaryOp {
        lhs: Box::new(Expr::Column(ColumnRef::new("id"))),
        op: BinaryOp::Eq,
        rhs: Box::new(Expr::Value(Value::I64(value))),
    }
}

#[test]
fn insert_single_row() {
    let insert = Insert {
        table: "users",
        columns: vec!["id", "name"],
        rows: vec![vec![Value::I64(1), Value::Text("A".into())]],
    };

    let (sql, params) = serialize(insert);
    assert_eq!(sql, r#"INSERT INTO "users" ("id", "name") VALUES (?, ?);"#);
    assert_eq!(params, vec![Value::I64(1), Value::Text("A".into())]);
}

#[test]
fn insert_multiple_rows_binds_row_major() {
    let insert = Insert {
        table: "users",
        columns: vec!["id", "name"],
        rows: vec![
            vec![Value::I64(1), Value::Text("A".into())],
            vec![Value::I64(2), Value::Text("B".into())],
        ],
    };

    let (sql, params) = serialize(insert);
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("id", "name") VALUES (?, ?), (?, ?);"#
    );
    assert_eq!(
        params,
        vec![
            Value::I64(1),
            Value::Text("A".into()),
            Value::I64(2),
            Value::Text("B".into()),
        ]
    );
}

#[test]
fn update_with_filter() {
    let update = Update {
        table: "users",
        assignments: vec![
            Assignment {
                column: "name",
                value: Value::Text("N2".into()),
            },
            Assignment {
                column: "integer",
                value: Value::I64(41),
            },
        ],
        filter: Some(id_filter(2000)),
    };

    let (sql, params) = serialize(update);
    assert_eq!(
        sql,
        r#"UPDATE "users" SET "name" = ?, "integer" = ? WHERE "id" = ?;"#
    );
    assert_eq!(
        params,
        vec![Value::Text("N2".into()), Value::I64(41), Value::I64(2000)]
    );
}

#[test]
fn delete_without_filter() {
    let delete = Delete {
        table: "users",
        filter: None,
    };

    let (sql, params) = serialize(delete);
    assert_eq!(sql, r#"DELETE FROM "users";"#);
    assert!(params.is_empty());
}

#[test]
fn delete_with_filter() {
    let delete = Delete {
        table: "users",
        filter: Some(id_filter(7)),
    };

    let (sql, params) = serialize(delete);
    assert_eq!(sql, r#"DELETE FROM "users" WHERE "id" = ?;"#);
    assert_eq!(params, vec![Value::I64(7)]);
}
