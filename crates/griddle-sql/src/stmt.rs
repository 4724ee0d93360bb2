mod alter_table;
pub use alter_table::{AlterTable, AlterTableOp};

mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_table;
pub use drop_table::DropTable;

mod expr;
pub use expr::{ColumnRef, Expr, OrderByItem};

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Returning, Select};

mod update;
pub use update::{Assignment, Update};

/// Any SQL statement Griddle can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    AlterTable(AlterTable),
    CreateTable(CreateTable),
    Delete(Delete),
    DropTable(DropTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

macro_rules! impl_statement_from {
    ( $( $variant:ident ),* ) => {
        $(
            impl From<$variant> for Statement {
                fn from(stmt: $variant) -> Self {
                    Self::$variant(stmt)
                }
            }
        )*
    };
}

impl_statement_from!(AlterTable, CreateTable, Delete, DropTable, Insert, Select, Update);
