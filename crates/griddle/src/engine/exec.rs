use crate::record::{Record, Row};
use crate::{DecodeError, Error, Result};

use griddle_core::driver::{Capability, Connection};
use griddle_core::stmt::{Type, Value};
use griddle_sql::stmt as sql;
use griddle_sql::Serializer;

/// Everything statement execution needs from the database handle.
pub(crate) struct ExecCx<'a> {
    pub(crate) conn: &'a mut dyn Connection,
    pub(crate) capability: &'static Capability,
    pub(crate) log_queries: bool,
}

impl ExecCx<'_> {
    /// Serialize with the driver's dialect, emitting the query event when
    /// query logging is enabled.
    fn render(&self, stmt: &sql::Statement) -> (String, Vec<Value>) {
        let mut params = vec![];
        let text = Serializer::new(self.capability).serialize(stmt, &mut params);
        if self.log_queries {
            trace_query!(&text, params.len());
        }
        (text, params)
    }

    /// Run a select and decode every row into a record.
    pub(crate) fn run<R: Record>(&mut self, select: &sql::Select) -> Result<Vec<R>> {
        let statement = sql::Statement::Select(select.clone());
        let (text, params) = self.render(&statement);

        let mut stmt = self.conn.prepare(&text)?;
        for (index, value) in params.iter().enumerate() {
            stmt.bind(index, value)?;
        }

        let mut records = vec![];
        while stmt.step()? {
            let mut row = Row::new(&mut *stmt);
            records.push(R::load(&mut row)?);
        }
        Ok(records)
    }

    /// Run a select and decode rows as raw values with the given column
    /// types. Used for pivot resolution.
    pub(crate) fn rows(&mut self, select: &sql::Select, tys: &[Type]) -> Result<Vec<Vec<Value>>> {
        let statement = sql::Statement::Select(select.clone());
        let (text, params) = self.render(&statement);

        let mut stmt = self.conn.prepare(&text)?;
        for (index, value) in params.iter().enumerate() {
            stmt.bind(index, value)?;
        }

        let mut rows = vec![];
        while stmt.step()? {
            let mut row = Vec::with_capacity(tys.len());
            for (index, ty) in tys.iter().enumerate() {
                row.push(stmt.column(index, *ty)?);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a `COUNT(*)` select and decode the single row.
    pub(crate) fn count(&mut self, select: &sql::Select) -> Result<u64> {
        let rows = self.rows(select, &[Type::I64])?;
        let Some(row) = rows.into_iter().next() else {
            return Err(Error::decode(DecodeError::MissingColumn { index: 0 }));
        };
        let count = i64::try_from(row.into_iter().next().unwrap_or(Value::Null))?;
        Ok(count as u64)
    }

    /// Run a statement that returns no rows.
    pub(crate) fn execute(&mut self, stmt: &sql::Statement) -> Result<u64> {
        let (text, params) = self.render(stmt);

        let mut prepared = self.conn.prepare(&text)?;
        for (index, value) in params.iter().enumerate() {
            prepared.bind(index, value)?;
        }
        prepared.execute()
    }
}
