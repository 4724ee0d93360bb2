mod value;

use rusqlite::Connection as RusqliteConnection;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use url::Url;

use griddle_core::driver::{Capability, Driver, LiveColumn, Statement};
use griddle_core::{stmt, DecodeError, Error, Result};

/// SQLite driver configuration.
#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a SQLite driver from a `sqlite:` connection URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::sql_exec(url_str.clone(), err))?;

        if url.scheme() != "sqlite" {
            return Err(Error::sql_exec(
                url_str.clone(),
                format!("connection URL does not have a `sqlite` scheme; url={url_str}"),
            ));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// An in-memory SQLite database.
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// A SQLite database at the given file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl Driver for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    fn connect(&self) -> Result<Box<dyn griddle_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => RusqliteConnection::open(path)
                .map_err(|err| Error::sql_exec(path.display().to_string(), err))?,
            Sqlite::InMemory => RusqliteConnection::open_in_memory()
                .map_err(|err| Error::sql_exec(":memory:", err))?,
        };
        Ok(Box::new(Connection { connection }))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    fn execute_simple(&mut self, sql: &str) -> Result<()> {
        self.connection
            .execute(sql, [])
            .map_err(|err| Error::sql_exec(sql, err))?;
        Ok(())
    }
}

impl griddle_core::Connection for Connection {
    fn prepare<'stmt>(&'stmt mut self, sql: &str) -> Result<Box<dyn Statement + 'stmt>> {
        let stmt = self
            .connection
            .prepare(sql)
            .map_err(|err| Error::sql_exec(sql, err))?;

        Ok(Box::new(PreparedStatement {
            sql: sql.to_owned(),
            stmt,
            rows: None,
            current: None,
        }))
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.execute_simple("BEGIN")
    }

    fn commit(&mut self) -> Result<()> {
        self.execute_simple("COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        self.execute_simple("ROLLBACK")
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<LiveColumn>> {
        const SQL: &str = r#"SELECT name, type, "notnull" FROM pragma_table_info(?1)"#;

        let mut stmt = self
            .connection
            .prepare(SQL)
            .map_err(|err| Error::sql_exec(SQL, err))?;

        let rows = stmt
            .query_map([table], |row| {
                let notnull: i64 = row.get(2)?;
                Ok(LiveColumn {
                    name: row.get(0)?,
                    ty: row.get(1)?,
                    nullable: notnull == 0,
                })
            })
            .map_err(|err| Error::sql_exec(SQL, err))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|err| Error::sql_exec(SQL, err))
    }
}

/// A prepared statement.
///
/// SQLite's stepping API ties row handles to the statement borrow, so the
/// result set is drained into a buffer on the first `step` and handed out
/// row by row from there.
struct PreparedStatement<'conn> {
    sql: String,
    stmt: rusqlite::Statement<'conn>,
    rows: Option<VecDeque<Vec<rusqlite::types::Value>>>,
    current: Option<Vec<rusqlite::types::Value>>,
}

impl Statement for PreparedStatement<'_> {
    fn bind(&mut self, index: usize, value: &stmt::Value) -> Result<()> {
        let converted = value::to_sql(value)?;
        self.stmt
            .raw_bind_parameter(index + 1, converted)
            .map_err(|err| Error::sql_exec(self.sql.clone(), err))
    }

    fn step(&mut self) -> Result<bool> {
        if self.rows.is_none() {
            let sql = self.sql.clone();
            let column_count = self.stmt.column_count();
            let mut buffered = VecDeque::new();

            let mut rows = self.stmt.raw_query();
            while let Some(row) = rows.next().map_err(|err| Error::sql_exec(sql.clone(), err))? {
                let mut values = Vec::with_capacity(column_count);
                for index in 0..column_count {
                    let value = row
                        .get_ref(index)
                        .map_err(|err| Error::sql_exec(sql.clone(), err))?;
                    values.push(value.into());
                }
                buffered.push_back(values);
            }

            self.rows = Some(buffered);
        }

        self.current = self.rows.as_mut().and_then(VecDeque::pop_front);
        Ok(self.current.is_some())
    }

    fn column(&mut self, index: usize, ty: stmt::Type) -> Result<stmt::Value> {
        let Some(row) = &self.current else {
            return Err(Error::decode(DecodeError::MissingColumn { index }));
        };
        let Some(value) = row.get(index) else {
            return Err(Error::decode(DecodeError::MissingColumn { index }));
        };
        value::from_sql(value, ty)
    }

    fn execute(&mut self) -> Result<u64> {
        self.stmt
            .raw_execute()
            .map(|count| count as u64)
            .map_err(|err| Error::sql_exec(self.sql.clone(), err))
    }
}
