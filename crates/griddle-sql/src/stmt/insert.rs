use griddle_core::stmt::Value;

/// An `INSERT` of one or more rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: &'static str,

    pub columns: Vec<&'static str>,

    /// Row values in user-supplied order; every row matches `columns`.
    pub rows: Vec<Vec<Value>>,
}
