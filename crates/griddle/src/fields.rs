use crate::stmt::Primitive;
use crate::Record;

use griddle_core::stmt::{BinaryOp, Direction, Expr, ExprColumn};

use std::marker::PhantomData;

/// A typed reference to one column of record form `M`.
///
/// Produced by the derive-generated `fields()` accessors; carries the
/// column name (after any override) and the Rust value type, so
/// comparisons are type-checked at the call site.
pub struct Col<M, V> {
    column: &'static str,
    _marker: PhantomData<fn() -> (M, V)>,
}

impl<M, V> Col<M, V> {
    #[doc(hidden)]
    pub const fn new(column: &'static str) -> Self {
        Self {
            column,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.column
    }
}

impl<M: Record, V: Primitive> Col<M, V> {
    fn expr(&self) -> Expr {
        Expr::column(M::NAME, self.column)
    }

    fn cmp(self, op: BinaryOp, value: impl Into<V>) -> Expr {
        Expr::binary_op(self.expr(), op, Expr::Value(value.into().to_value()))
    }

    pub fn eq(self, value: impl Into<V>) -> Expr {
        self.cmp(BinaryOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<V>) -> Expr {
        self.cmp(BinaryOp::Ne, value)
    }

    pub fn lt(self, value: impl Into<V>) -> Expr {
        self.cmp(BinaryOp::Lt, value)
    }

    pub fn le(self, value: impl Into<V>) -> Expr {
        self.cmp(BinaryOp::Le, value)
    }

    pub fn gt(self, value: impl Into<V>) -> Expr {
        self.cmp(BinaryOp::Gt, value)
    }

    pub fn ge(self, value: impl Into<V>) -> Expr {
        self.cmp(BinaryOp::Ge, value)
    }

    pub fn is_null(self) -> Expr {
        Expr::IsNull {
            column: ExprColumn {
                form: M::NAME,
                column: self.column,
            },
            negate: false,
        }
    }

    pub fn is_not_null(self) -> Expr {
        Expr::IsNull {
            column: ExprColumn {
                form: M::NAME,
                column: self.column,
            },
            negate: true,
        }
    }

    pub fn asc(self) -> Order<M> {
        Order {
            column: self.column,
            direction: Direction::Asc,
            _marker: PhantomData,
        }
    }

    pub fn desc(self) -> Order<M> {
        Order {
            column: self.column,
            direction: Direction::Desc,
            _marker: PhantomData,
        }
    }
}

impl<M, V> Clone for Col<M, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, V> Copy for Col<M, V> {}

/// An ordering over a column of form `M`, produced by [`Col::asc`] /
/// [`Col::desc`].
pub struct Order<M> {
    pub(crate) column: &'static str,
    pub(crate) direction: Direction,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Clone for Order<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Order<M> {}

/// A typed reference to a child-collection field of `M` with element `C`.
///
/// Carries the setter the materializer uses to stitch loaded children onto
/// their parent.
pub struct HasManyField<M, C> {
    field: &'static str,
    set: fn(&mut M, Vec<C>),
}

impl<M, C> HasManyField<M, C> {
    #[doc(hidden)]
    pub const fn new(field: &'static str, set: fn(&mut M, Vec<C>)) -> Self {
        Self { field, set }
    }

    pub fn name(&self) -> &'static str {
        self.field
    }

    pub(crate) fn assign(&self, parent: &mut M, rows: Vec<C>) {
        (self.set)(parent, rows)
    }
}

impl<M, C> Clone for HasManyField<M, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, C> Copy for HasManyField<M, C> {}
