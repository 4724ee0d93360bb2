use crate::engine::ChildLoad;
use crate::record::Record;
use crate::{Error, QueryError};

use griddle_core::stmt::{Direction, Expr, Limit, Type};

/// Sentinel spec index for a join that was rejected at construction time.
pub(crate) const SPEC_NONE: usize = usize::MAX;

/// The untyped state shared by every builder in a chain.
///
/// Builders are thin phantom-typed wrappers over this; the type system
/// enforces which transitions exist while the chain accumulates the data
/// the engine lowers from. Construction-time failures are parked in
/// `error` and surface at the terminal operation.
pub(crate) struct Chain<M: Record> {
    /// Join descriptors, in chain order. Nested joins appear after their
    /// parent.
    pub(crate) specs: Vec<JoinSpec>,

    /// Loaders for root-level joins; nested loaders live inside their
    /// parent loader.
    pub(crate) loaders: Vec<Box<dyn ChildLoad<M>>>,

    /// Orderings attached to the root focus.
    pub(crate) orders: Vec<(&'static str, Direction)>,

    /// Pagination attached to the root focus.
    pub(crate) limit: Option<Limit>,

    /// The `where` predicate; split across statements during lowering.
    pub(crate) filter: Option<Expr>,

    /// First construction error observed, if any.
    pub(crate) error: Option<Error>,
}

/// One join, as pure data. The typed stitching glue lives in the loader
/// that references this spec by index.
pub(crate) struct JoinSpec {
    /// Child-collection field name on the parent form.
    pub(crate) field: &'static str,

    /// Form owning the joined field.
    pub(crate) parent_form: &'static str,

    /// Element form of the child collection.
    pub(crate) child_form: &'static str,

    /// Column on the parent form whose values key the child load.
    pub(crate) parent_key: &'static str,

    /// Column on the child form matched against the parent key values.
    pub(crate) child_key: &'static str,

    pub(crate) pivot: Option<PivotSpec>,

    /// Orderings attached to this join's focus.
    pub(crate) orders: Vec<(&'static str, Direction)>,

    /// Pagination attached to this join's focus.
    pub(crate) limit: Option<Limit>,

    /// Predicate conjuncts routed to this join's auxiliary statement.
    pub(crate) filter: Option<Expr>,
}

/// The intermediary table of a pivot join.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PivotSpec {
    pub(crate) table: &'static str,

    /// Pivot column matched against the parent key values.
    pub(crate) parent_key: &'static str,

    /// Pivot column whose values select child rows.
    pub(crate) child_key: &'static str,

    pub(crate) parent_key_ty: Type,

    pub(crate) child_key_ty: Type,
}

impl<M: Record> Chain<M> {
    pub(crate) fn new() -> Self {
        Self {
            specs: vec![],
            loaders: vec![],
            orders: vec![],
            limit: None,
            filter: None,
            error: None,
        }
    }

    /// Record a construction failure; the first one wins.
    pub(crate) fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Append a join spec, rejecting duplicates of the same field.
    pub(crate) fn push_spec<P: Record, C: Record>(
        &mut self,
        field: &'static str,
        parent_key: &'static str,
        child_key: &'static str,
        pivot: Option<PivotSpec>,
    ) -> usize {
        let duplicate = self
            .specs
            .iter()
            .any(|spec| spec.parent_form == P::NAME && spec.field == field);
        if duplicate {
            self.fail(Error::query(QueryError::DuplicateJoin { field }));
            return SPEC_NONE;
        }

        self.specs.push(JoinSpec {
            field,
            parent_form: P::NAME,
            child_form: C::NAME,
            parent_key,
            child_key,
            pivot,
            orders: vec![],
            limit: None,
            filter: None,
        });
        self.specs.len() - 1
    }

    /// Attach an ordering to the join at `spec`.
    pub(crate) fn push_focus_order(
        &mut self,
        spec: usize,
        column: &'static str,
        direction: Direction,
    ) {
        if spec != SPEC_NONE {
            self.specs[spec].orders.push((column, direction));
        }
    }

    /// Attach pagination to the join at `spec`.
    pub(crate) fn set_focus_limit(&mut self, spec: usize, limit: Limit) {
        if spec != SPEC_NONE {
            self.specs[spec].limit = Some(limit);
        }
    }
}
