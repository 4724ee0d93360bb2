use super::Column;
use crate::{Error, Result, SchemaError};

/// The reflected schema of one record type.
///
/// Built once per record type by the derive-generated `table_schema` and
/// cached for the process lifetime. Column order is declaration order and
/// defines parameter-binding order for inserts and updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Structural name of the record form (`Parent`, not `parents`).
    pub form: &'static str,

    /// Name of the database table.
    pub name: &'static str,

    /// Ordered column set. Child collection fields never appear here.
    pub columns: Vec<Column>,

    /// Index into `columns` of the primary key, if any.
    pub primary_key: Option<usize>,

    /// Child collection descriptors, in declaration order.
    pub children: Vec<ChildCollection>,
}

/// Descriptor of one child-collection field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCollection {
    /// Name of the field on the parent record.
    pub field: &'static str,

    /// Structural name of the element form.
    pub element: &'static str,
}

impl Table {
    /// Assemble a table schema, resolving the primary key.
    ///
    /// An explicit key always wins; without one, the column literally named
    /// `id` is used when present. `explicit_key` greater than the column
    /// count, or a duplicate explicit key, is a schema error.
    pub fn new(
        form: &'static str,
        name: &'static str,
        columns: Vec<Column>,
        explicit_key: Option<usize>,
        children: Vec<ChildCollection>,
    ) -> Result<Self> {
        let primary_key = match explicit_key {
            Some(index) => {
                if index >= columns.len() {
                    return Err(Error::schema(SchemaError::AmbiguousPrimaryKey {
                        table: name.to_owned(),
                    }));
                }
                Some(index)
            }
            None => columns.iter().position(|column| column.name == "id"),
        };

        Ok(Self {
            form,
            name,
            columns,
            primary_key,
            children,
        })
    }

    /// Index of the column with the given name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub fn column(&self, column: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == column)
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.primary_key.map(|index| &self.columns[index])
    }

    pub fn child(&self, field: &str) -> Option<&ChildCollection> {
        self.children.iter().find(|c| c.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Type;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", Type::I64, false),
            Column::new("serial", Type::I64, false),
            Column::new("name", Type::Text, true),
        ]
    }

    #[test]
    fn implicit_id_primary_key() {
        let table = Table::new("Foo", "foos", columns(), None, vec![]).unwrap();
        assert_eq!(table.primary_key, Some(0));
        assert_eq!(table.primary_key_column().unwrap().name, "id");
    }

    #[test]
    fn explicit_key_wins_over_id_column() {
        let table = Table::new("Foo", "foos", columns(), Some(1), vec![]).unwrap();
        assert_eq!(table.primary_key, Some(1));
        assert_eq!(table.primary_key_column().unwrap().name, "serial");
    }

    #[test]
    fn no_key_when_no_id() {
        let cols = vec![Column::new("name", Type::Text, false)];
        let table = Table::new("Foo", "foos", cols, None, vec![]).unwrap();
        assert_eq!(table.primary_key, None);
    }

    #[test]
    fn column_lookup() {
        let table = Table::new("Foo", "foos", columns(), None, vec![]).unwrap();
        assert_eq!(table.column_index("name"), Some(2));
        assert_eq!(table.column_index("missing"), None);
    }
}
