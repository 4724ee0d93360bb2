use crate::query::chain::{Chain, JoinSpec, PivotSpec};
use crate::record::Record;
use crate::{Error, Result, SqlGenError};

use griddle_core::schema::Table;
use griddle_core::stmt::{BinaryOp, Expr, ExprColumn, Value};
use griddle_sql::stmt as sql;

/// Alias of the principal statement's table.
const PRINCIPAL_ALIAS: &str = "t0";

/// Route the chain's predicate: each top-level conjunct stays on the
/// principal when it references only the root form, or moves to the
/// auxiliary statement of the join it references. A conjunct touching more
/// than one form, or a form not in the chain, is an error.
pub(crate) fn split_filter<M: Record>(chain: &mut Chain<M>) -> Result<()> {
    let Some(filter) = chain.filter.take() else {
        return Ok(());
    };

    let mut root_filter: Option<Expr> = None;
    for conjunct in filter.into_conjuncts() {
        let forms = conjunct.referenced_forms();
        if forms.len() > 1 {
            return Err(Error::sql_gen(SqlGenError::CrossFormPredicate));
        }

        match forms.into_iter().next() {
            None => root_filter = and_opt(root_filter, conjunct),
            Some(form) if form == M::NAME => root_filter = and_opt(root_filter, conjunct),
            Some(form) => {
                let Some(spec) = chain.specs.iter_mut().find(|spec| spec.child_form == form)
                else {
                    return Err(Error::sql_gen(SqlGenError::UnknownForm {
                        form: form.to_owned(),
                    }));
                };
                spec.filter = and_opt(spec.filter.take(), conjunct);
            }
        }
    }

    chain.filter = root_filter;
    Ok(())
}

fn and_opt(filter: Option<Expr>, conjunct: Expr) -> Option<Expr> {
    Some(match filter {
        Some(existing) => existing.and(conjunct),
        None => conjunct,
    })
}

/// Build the principal statement: the aliased, fully-qualified column list
/// of the root form, its routed predicate, and the root focus ordering and
/// pagination. Joins contribute nothing here.
pub(crate) fn principal<M: Record>(
    chain: &Chain<M>,
    schema: &Table,
    count: bool,
) -> Result<sql::Select> {
    let returning = if count {
        sql::Returning::Count
    } else {
        sql::Returning::Columns(
            schema
                .columns
                .iter()
                .map(|column| sql::ColumnRef::qualified(PRINCIPAL_ALIAS, column.name))
                .collect(),
        )
    };

    let mut select = sql::Select::new(schema.name, returning);
    select.alias = Some(PRINCIPAL_ALIAS);

    if let Some(filter) = &chain.filter {
        select.filter = Some(resolve(filter, M::NAME, schema, Some(PRINCIPAL_ALIAS))?);
    }

    if !count {
        for &(column, direction) in &chain.orders {
            require_column(M::NAME, schema, column)?;
            select.order_by.push(sql::OrderByItem {
                column: sql::ColumnRef::qualified(PRINCIPAL_ALIAS, column),
                direction,
            });
        }
        select.limit = chain.limit;
    }

    Ok(select)
}

/// Build a join's auxiliary statement: every child column, the `IN` set
/// over the observed parent keys, the routed child predicate, and the
/// join's own ordering and pagination.
pub(crate) fn auxiliary(
    spec: &JoinSpec,
    child_schema: &Table,
    keys: Vec<Value>,
) -> Result<sql::Select> {
    require_column(spec.child_form, child_schema, spec.child_key)?;

    let returning = sql::Returning::Columns(
        child_schema
            .columns
            .iter()
            .map(|column| sql::ColumnRef::new(column.name))
            .collect(),
    );

    let mut select = sql::Select::new(child_schema.name, returning);

    let in_list = sql::Expr::InList {
        column: sql::ColumnRef::new(spec.child_key),
        values: keys,
    };
    select.filter = Some(match &spec.filter {
        Some(filter) => in_list.and(resolve(filter, spec.child_form, child_schema, None)?),
        None => in_list,
    });

    for &(column, direction) in &spec.orders {
        require_column(spec.child_form, child_schema, column)?;
        select.order_by.push(sql::OrderByItem {
            column: sql::ColumnRef::new(column),
            direction,
        });
    }
    select.limit = spec.limit;

    Ok(select)
}

/// Build the pivot-resolution statement: both pivot key columns for every
/// pivot row matching the observed parent keys.
pub(crate) fn pivot(pivot: &PivotSpec, keys: Vec<Value>) -> sql::Select {
    let mut select = sql::Select::new(
        pivot.table,
        sql::Returning::Columns(vec![
            sql::ColumnRef::new(pivot.parent_key),
            sql::ColumnRef::new(pivot.child_key),
        ]),
    );
    select.filter = Some(sql::Expr::InList {
        column: sql::ColumnRef::new(pivot.parent_key),
        values: keys,
    });
    select
}

/// Lower a routed predicate to its SQL form, resolving every column
/// reference against `schema` and rewriting null comparisons to `IS NULL`.
pub(crate) fn resolve(
    expr: &Expr,
    form: &'static str,
    schema: &Table,
    qualifier: Option<&'static str>,
) -> Result<sql::Expr> {
    Ok(match expr {
        Expr::Value(value) => sql::Expr::Value(value.clone()),
        Expr::Column(column) => {
            sql::Expr::Column(resolve_column(column, form, schema, qualifier)?)
        }
        Expr::And(operands) => sql::Expr::And(
            operands
                .iter()
                .map(|operand| resolve(operand, form, schema, qualifier))
                .collect::<Result<_>>()?,
        ),
        Expr::Or(operands) => sql::Expr::Or(
            operands
                .iter()
                .map(|operand| resolve(operand, form, schema, qualifier))
                .collect::<Result<_>>()?,
        ),
        Expr::Not(operand) => sql::Expr::Not(Box::new(resolve(operand, form, schema, qualifier)?)),
        Expr::BinaryOp { lhs, op, rhs } => {
            match null_comparison(lhs, *op, rhs) {
                Some((column, negate)) => sql::Expr::IsNull {
                    column: resolve_column(column, form, schema, qualifier)?,
                    negate,
                },
                None => sql::Expr::BinaryOp {
                    lhs: Box::new(resolve(lhs, form, schema, qualifier)?),
                    op: *op,
                    rhs: Box::new(resolve(rhs, form, schema, qualifier)?),
                },
            }
        }
        Expr::IsNull { column, negate } => sql::Expr::IsNull {
            column: resolve_column(column, form, schema, qualifier)?,
            negate: *negate,
        },
    })
}

/// `col = NULL` and `col <> NULL` mean the SQL null tests.
fn null_comparison<'a>(
    lhs: &'a Expr,
    op: BinaryOp,
    rhs: &'a Expr,
) -> Option<(&'a ExprColumn, bool)> {
    let negate = match op {
        BinaryOp::Eq => false,
        BinaryOp::Ne => true,
        _ => return None,
    };

    match (lhs, rhs) {
        (Expr::Column(column), Expr::Value(Value::Null))
        | (Expr::Value(Value::Null), Expr::Column(column)) => Some((column, negate)),
        _ => None,
    }
}

fn resolve_column(
    column: &ExprColumn,
    form: &'static str,
    schema: &Table,
    qualifier: Option<&'static str>,
) -> Result<sql::ColumnRef> {
    if column.form != form {
        return Err(Error::sql_gen(SqlGenError::UnknownForm {
            form: column.form.to_owned(),
        }));
    }
    require_column(form, schema, column.column)?;

    Ok(match qualifier {
        Some(qualifier) => sql::ColumnRef::qualified(qualifier, column.column),
        None => sql::ColumnRef::new(column.column),
    })
}

fn require_column(form: &str, schema: &Table, column: &str) -> Result<()> {
    if schema.column_index(column).is_none() {
        return Err(Error::sql_gen(SqlGenError::UnknownColumn {
            form: form.to_owned(),
            column: column.to_owned(),
        }));
    }
    Ok(())
}
