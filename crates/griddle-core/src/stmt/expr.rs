use super::{BinaryOp, Value};

use indexmap::IndexSet;
use std::ops;

/// A pure predicate expression over one or more record forms.
///
/// Expressions are built by the typed column accessors and combined with
/// `&`, `|`, and `!` (or the [`and`](Expr::and) / [`or`](Expr::or) /
/// [`negate`](Expr::negate) methods). Nothing is evaluated here; lowering
/// to SQL happens when the owning chain reaches a terminal operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value; becomes a positional placeholder in SQL.
    Value(Value),

    /// A reference to a column of a specific form.
    Column(ExprColumn),

    /// Logical conjunction of two or more operands.
    And(Vec<Expr>),

    /// Logical disjunction of two or more operands.
    Or(Vec<Expr>),

    /// Logical negation.
    Not(Box<Expr>),

    /// A binary comparison.
    BinaryOp {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },

    /// `IS NULL` / `IS NOT NULL` test on a column.
    IsNull { column: ExprColumn, negate: bool },
}

/// A column of a named form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprColumn {
    /// Structural name of the record form the column belongs to.
    pub form: &'static str,

    /// Column name, after any field-name override.
    pub column: &'static str,
}

impl Expr {
    pub fn column(form: &'static str, column: &'static str) -> Self {
        Self::Column(ExprColumn { form, column })
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn binary_op(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Self::BinaryOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Conjunction, flattening nested `And` nodes.
    pub fn and(self, other: Expr) -> Self {
        match (self, other) {
            (Self::And(mut lhs), Self::And(rhs)) => {
                lhs.extend(rhs);
                Self::And(lhs)
            }
            (Self::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::And(lhs)
            }
            (lhs, Self::And(mut rhs)) => {
                rhs.insert(0, lhs);
                Self::And(rhs)
            }
            (lhs, rhs) => Self::And(vec![lhs, rhs]),
        }
    }

    /// Disjunction, flattening nested `Or` nodes.
    pub fn or(self, other: Expr) -> Self {
        match (self, other) {
            (Self::Or(mut lhs), Self::Or(rhs)) => {
                lhs.extend(rhs);
                Self::Or(lhs)
            }
            (Self::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::Or(lhs)
            }
            (lhs, Self::Or(mut rhs)) => {
                rhs.insert(0, lhs);
                Self::Or(rhs)
            }
            (lhs, rhs) => Self::Or(vec![lhs, rhs]),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// The set of forms referenced by column references in this expression,
    /// in first-reference order.
    pub fn referenced_forms(&self) -> IndexSet<&'static str> {
        let mut forms = IndexSet::new();
        self.collect_forms(&mut forms);
        forms
    }

    fn collect_forms(&self, forms: &mut IndexSet<&'static str>) {
        match self {
            Self::Value(_) => {}
            Self::Column(column) => {
                forms.insert(column.form);
            }
            Self::And(operands) | Self::Or(operands) => {
                for operand in operands {
                    operand.collect_forms(forms);
                }
            }
            Self::Not(inner) => inner.collect_forms(forms),
            Self::BinaryOp { lhs, rhs, .. } => {
                lhs.collect_forms(forms);
                rhs.collect_forms(forms);
            }
            Self::IsNull { column, .. } => {
                forms.insert(column.form);
            }
        }
    }

    /// Split a predicate into its top-level conjuncts.
    pub fn into_conjuncts(self) -> Vec<Expr> {
        match self {
            Self::And(operands) => operands,
            other => vec![other],
        }
    }
}

impl ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.negate()
    }
}
