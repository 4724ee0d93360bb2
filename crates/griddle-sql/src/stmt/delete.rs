use super::Expr;

/// A `DELETE` over a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: &'static str,

    pub filter: Option<Expr>,
}
