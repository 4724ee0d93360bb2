use super::Expr;

use griddle_core::stmt::Value;

/// An `UPDATE` over a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: &'static str,

    pub assignments: Vec<Assignment>,

    pub filter: Option<Expr>,
}

/// One `SET column = ?` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: &'static str,
    pub value: Value,
}
