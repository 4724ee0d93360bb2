use griddle_core::stmt::{BinaryOp, Direction, Value};

/// A predicate expression with every column reference already resolved
/// against a table of the chain.
///
/// This is the lowered form of `griddle_core::stmt::Expr`: form names have
/// become table qualifiers and the engine has routed each conjunct to the
/// statement it belongs on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal; serialized as a positional placeholder.
    Value(Value),

    Column(ColumnRef),

    And(Vec<Expr>),

    Or(Vec<Expr>),

    Not(Box<Expr>),

    BinaryOp {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },

    /// `column IN (?, ?, ...)`.
    InList {
        column: ColumnRef,
        values: Vec<Value>,
    },

    /// `column IS [NOT] NULL`.
    IsNull { column: ColumnRef, negate: bool },
}

impl Expr {
    /// Conjoin, flattening into an existing `And` when possible.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Self::And(mut operands) => {
                operands.push(other);
                Self::And(operands)
            }
            lhs => Self::And(vec![lhs, other]),
        }
    }
}

/// A resolved column reference, optionally qualified by a table alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<&'static str>,
    pub name: &'static str,
}

impl ColumnRef {
    pub fn new(name: &'static str) -> Self {
        Self {
            qualifier: None,
            name,
        }
    }

    pub fn qualified(qualifier: &'static str, name: &'static str) -> Self {
        Self {
            qualifier: Some(qualifier),
            name,
        }
    }
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderByItem {
    pub column: ColumnRef,
    pub direction: Direction,
}
