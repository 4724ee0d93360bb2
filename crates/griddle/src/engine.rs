mod exec;
pub(crate) use exec::ExecCx;

mod load;
pub(crate) use load::{ChildLoad, JoinLoader};

mod lower;

use crate::db::Database;
use crate::query::chain::Chain;
use crate::record::Record;
use crate::Result;

use griddle_sql::stmt as sql;

/// Emit the error event for failures crossing the engine boundary.
pub(crate) fn observe<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        trace_error!(err);
    }
    result
}

fn take_error<M: Record>(chain: &mut Chain<M>) -> Result<()> {
    match chain.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Run the principal select, then the child-load protocol for each
/// root-level join in chain order.
pub(crate) fn select<M: Record>(db: &mut Database, mut chain: Chain<M>) -> Result<Vec<M>> {
    let result = (|| -> Result<Vec<M>> {
        take_error(&mut chain)?;
        lower::split_filter(&mut chain)?;

        let schema = M::schema()?;
        let principal = lower::principal::<M>(&chain, &schema, false)?;

        let mut cx = db.exec_cx();
        let mut records = cx.run::<M>(&principal)?;

        if !records.is_empty() {
            for loader in &chain.loaders {
                loader.load(&mut cx, &chain.specs, &mut records)?;
            }
        }

        Ok(records)
    })();

    observe(result)
}

/// `SELECT COUNT(*)` with the principal's FROM and WHERE; no ordering,
/// pagination, or auxiliary statements.
pub(crate) fn count<M: Record>(db: &mut Database, mut chain: Chain<M>) -> Result<u64> {
    let result = (|| -> Result<u64> {
        take_error(&mut chain)?;
        lower::split_filter(&mut chain)?;

        let schema = M::schema()?;
        let principal = lower::principal::<M>(&chain, &schema, true)?;

        db.exec_cx().count(&principal)
    })();

    observe(result)
}

pub(crate) fn insert<M: Record>(
    db: &mut Database,
    mut chain: Chain<M>,
    rows: &[M],
) -> Result<u64> {
    let result = (|| -> Result<u64> {
        take_error(&mut chain)?;

        if rows.is_empty() {
            return Ok(0);
        }

        let schema = M::schema()?;
        let insert = sql::Insert {
            table: schema.name,
            columns: schema.columns.iter().map(|column| column.name).collect(),
            rows: rows.iter().map(Record::values).collect(),
        };

        db.exec_cx().execute(&insert.into())
    })();

    observe(result)
}

/// Build the SET list from the update's key filters, bind the record's
/// values, and execute. The primary key column never appears in SET.
pub(crate) fn update<M: Record>(
    db: &mut Database,
    mut chain: Chain<M>,
    record: &M,
    set_keys: &[&'static str],
    ignore_keys: &[&'static str],
) -> Result<u64> {
    let result = (|| -> Result<u64> {
        take_error(&mut chain)?;

        let schema = M::schema()?;
        let mut assignments = vec![];
        for (index, column) in schema.columns.iter().enumerate() {
            if schema.primary_key == Some(index) {
                continue;
            }
            let included = if set_keys.is_empty() {
                !ignore_keys.contains(&column.name)
            } else {
                set_keys.contains(&column.name)
            };
            if included {
                assignments.push(sql::Assignment {
                    column: column.name,
                    value: record.value_at(index),
                });
            }
        }

        if assignments.is_empty() {
            return Ok(0);
        }

        let filter = match &chain.filter {
            Some(filter) => Some(lower::resolve(filter, M::NAME, &schema, None)?),
            None => None,
        };

        let update = sql::Update {
            table: schema.name,
            assignments,
            filter,
        };

        db.exec_cx().execute(&update.into())
    })();

    observe(result)
}

pub(crate) fn delete<M: Record>(db: &mut Database, mut chain: Chain<M>) -> Result<u64> {
    let result = (|| -> Result<u64> {
        take_error(&mut chain)?;

        let schema = M::schema()?;
        let filter = match &chain.filter {
            Some(filter) => Some(lower::resolve(filter, M::NAME, &schema, None)?),
            None => None,
        };

        let delete = sql::Delete {
            table: schema.name,
            filter,
        };

        db.exec_cx().execute(&delete.into())
    })();

    observe(result)
}
