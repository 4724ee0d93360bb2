use super::ColumnDef;

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: &'static str,

    pub columns: Vec<ColumnDef>,

    /// Name of the primary key column, if the schema declares one.
    pub primary_key: Option<&'static str>,

    pub if_not_exists: bool,
}
