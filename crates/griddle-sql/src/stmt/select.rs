use super::{ColumnRef, Expr, OrderByItem};

use griddle_core::stmt::Limit;

/// A `SELECT` over a single table.
///
/// Joins never appear here: the engine issues one principal select for the
/// root form and one auxiliary select per joined child collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: &'static str,

    /// Alias for the table; the principal statement uses `t0`.
    pub alias: Option<&'static str>,

    pub returning: Returning,

    pub filter: Option<Expr>,

    pub order_by: Vec<OrderByItem>,

    pub limit: Option<Limit>,
}

/// What the select projects.
#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    /// An explicit column list.
    Columns(Vec<ColumnRef>),

    /// `COUNT(*)`.
    Count,
}

impl Select {
    pub fn new(table: &'static str, returning: Returning) -> Self {
        Self {
            table,
            alias: None,
            returning,
            filter: None,
            order_by: vec![],
            limit: None,
        }
    }
}
