use crate::create::CreatePolicy;
use crate::db::Database;
use crate::stmt::Primitive;
use crate::Result;

use griddle_core::{driver, schema, stmt};

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

/// A struct that maps onto a SQL table.
///
/// Implemented with `#[derive(Record)]`; the derive reflects the fields in
/// declaration order, which fixes the column order and with it the
/// parameter-binding order for inserts and updates.
pub trait Record: Sized + 'static {
    /// Structural name of the record form.
    const NAME: &'static str;

    /// Name of the database table; defaults to the structural name.
    const TABLE: &'static str;

    /// Reflect the table schema. Use [`Record::schema`] for the cached
    /// copy; reflection itself is pure and never touches the database.
    fn table_schema() -> Result<schema::Table>;

    /// The process-wide cached schema for this record type.
    fn schema() -> Result<Arc<schema::Table>> {
        schema::schema_for(TypeId::of::<Self>(), Self::table_schema)
    }

    /// Decode one row, reading columns in schema order. Child collection
    /// fields start out absent.
    fn load(row: &mut Row<'_>) -> Result<Self>;

    /// Encode the column fields in schema order.
    fn values(&self) -> Vec<stmt::Value>;

    /// The value of the column field at `index`, `Null` when out of range.
    fn value_at(&self, index: usize) -> stmt::Value;

    /// Child-collection descriptors used by table-creation recursion.
    fn children() -> &'static [ChildMeta] {
        &[]
    }
}

/// Creation glue for one child-collection field.
///
/// `create` recurses table creation into the element type; it is a plain
/// fn pointer so the descriptor list stays `'static` data.
pub struct ChildMeta {
    pub field: &'static str,
    pub element: &'static str,
    pub create: fn(&mut Database, CreatePolicy, &mut HashSet<&'static str>) -> Result<()>,
}

/// A cursor over the columns of the driver's current row.
pub struct Row<'a> {
    stmt: &'a mut dyn driver::Statement,
    index: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn new(stmt: &'a mut dyn driver::Statement) -> Self {
        Self { stmt, index: 0 }
    }

    /// Read the next column, dispatching through the driver's typed read.
    pub fn read<V: Primitive>(&mut self) -> Result<V> {
        let index = self.index;
        self.index += 1;
        let value = self.stmt.column(index, V::ty())?;
        V::load(value)
    }
}
