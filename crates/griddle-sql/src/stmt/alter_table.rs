use super::ColumnDef;

/// An `ALTER TABLE` statement carrying a single column change.
///
/// Reconciliation emits one statement per change so that dialects without
/// multi-action alters stay supported.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTable {
    pub name: &'static str,

    pub op: AlterTableOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableOp {
    AddColumn(ColumnDef),

    /// The dropped column is named by the live table, not the schema.
    DropColumn(String),
}
