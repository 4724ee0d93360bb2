pub(crate) mod chain;

mod update;
pub use update::UpdateOp;

use crate::db::Database;
use crate::engine::{self, ChildLoad, JoinLoader};
use crate::fields::{Col, HasManyField, Order};
use crate::record::Record;
use crate::stmt::Primitive;
use crate::{Error, QueryError, Result};

use chain::{Chain, PivotSpec, SPEC_NONE};

use griddle_core::stmt::{Expr, Limit};

use std::any::Any;

/// The root of a query chain over record type `M`.
///
/// Every chain starts at a table; the legal successors of each operation
/// are encoded in the builder types, so an illegal chain does not compile.
/// `order` and `limit` attach to the current focus form: the root here,
/// the joined child collection on [`Joined`].
pub struct Query<M: Record> {
    chain: Chain<M>,
}

/// A chain whose root focus has been ordered.
pub struct Ordered<M: Record> {
    chain: Chain<M>,
}

/// A chain whose root focus has been limited. No further ordering may be
/// attached to this focus.
pub struct Limited<M: Record> {
    chain: Chain<M>,
}

/// A chain focused on the child collection joined last.
pub struct Joined<M: Record, F: Record> {
    ctx: FocusCtx<M, F>,
}

/// A joined focus that has been limited.
pub struct JoinedLimited<M: Record, F: Record> {
    ctx: FocusCtx<M, F>,
}

/// A filtered chain. `filter` is always the penultimate operation; only
/// terminals remain.
pub struct Filtered<M: Record> {
    chain: Chain<M>,
}

/// A chain filtered directly on the root table, where `update` and
/// `delete` stay available.
pub struct FilteredTable<M: Record> {
    chain: Chain<M>,
}

/// Focus bookkeeping shared by [`Joined`] and [`JoinedLimited`]: the
/// pending loader for the focused join is held typed here and folded into
/// the chain when the focus moves or a terminal runs.
struct FocusCtx<M: Record, F: Record> {
    chain: Chain<M>,
    nested: Vec<Box<dyn ChildLoad<F>>>,
    spec: usize,
    commit: Committer<M, F>,
}

type Committer<M, F> = Box<dyn FnOnce(&mut Chain<M>, Vec<Box<dyn ChildLoad<F>>>)>;

impl<M: Record> Query<M> {
    /// Start a chain over `M`'s table.
    pub fn table() -> Self {
        Self {
            chain: Chain::new(),
        }
    }

    /// Join a child collection of the root form: child rows where
    /// `equals = on` become the field's loaded value.
    pub fn join<C, K>(
        self,
        field: HasManyField<M, C>,
        on: Col<M, K>,
        equals: Col<C, K>,
    ) -> Joined<M, C>
    where
        C: Record + Clone,
    {
        join_root(self.chain, field, on.name(), equals.name(), None)
    }

    /// Join a child collection reached through a pivot table via two
    /// equi-joins.
    pub fn join_through<P, C, K1, K2>(
        self,
        field: HasManyField<M, C>,
        on: Col<M, K1>,
        pivot_on: Col<P, K1>,
        equals: Col<C, K2>,
        pivot_equals: Col<P, K2>,
    ) -> Joined<M, C>
    where
        P: Record,
        C: Record + Clone,
        K1: Primitive,
        K2: Primitive,
    {
        let pivot = pivot_spec::<P, K1, K2>(pivot_on, pivot_equals);
        join_root(self.chain, field, on.name(), equals.name(), Some(pivot))
    }

    pub fn order(mut self, order: Order<M>) -> Ordered<M> {
        self.chain.orders.push((order.column, order.direction));
        Ordered { chain: self.chain }
    }

    pub fn limit(mut self, count: u64) -> Limited<M> {
        self.chain.limit = Some(Limit::new(count));
        Limited { chain: self.chain }
    }

    pub fn limit_offset(mut self, count: u64, offset: u64) -> Limited<M> {
        self.chain.limit = Some(Limit::with_offset(count, offset));
        Limited { chain: self.chain }
    }

    pub fn filter(mut self, filter: Expr) -> FilteredTable<M> {
        self.chain.filter = Some(filter);
        FilteredTable { chain: self.chain }
    }

    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.chain)
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.chain)?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.chain)
    }

    /// Insert `rows` in the given order. Inserting zero rows is a no-op.
    pub fn insert(self, db: &mut Database, rows: &[M]) -> Result<u64> {
        engine::insert(db, self.chain, rows)
    }

    /// Update every row of the table from `record`'s column values.
    pub fn update(self, record: &M) -> UpdateOp<'_, M> {
        UpdateOp::new(self.chain, record)
    }

    /// Delete every row of the table.
    pub fn delete(self, db: &mut Database) -> Result<u64> {
        engine::delete(db, self.chain)
    }
}

impl<M: Record> Ordered<M> {
    pub fn join<C, K>(
        self,
        field: HasManyField<M, C>,
        on: Col<M, K>,
        equals: Col<C, K>,
    ) -> Joined<M, C>
    where
        C: Record + Clone,
    {
        join_root(self.chain, field, on.name(), equals.name(), None)
    }

    pub fn join_through<P, C, K1, K2>(
        self,
        field: HasManyField<M, C>,
        on: Col<M, K1>,
        pivot_on: Col<P, K1>,
        equals: Col<C, K2>,
        pivot_equals: Col<P, K2>,
    ) -> Joined<M, C>
    where
        P: Record,
        C: Record + Clone,
        K1: Primitive,
        K2: Primitive,
    {
        let pivot = pivot_spec::<P, K1, K2>(pivot_on, pivot_equals);
        join_root(self.chain, field, on.name(), equals.name(), Some(pivot))
    }

    pub fn order(mut self, order: Order<M>) -> Ordered<M> {
        self.chain.orders.push((order.column, order.direction));
        self
    }

    pub fn limit(mut self, count: u64) -> Limited<M> {
        self.chain.limit = Some(Limit::new(count));
        Limited { chain: self.chain }
    }

    pub fn limit_offset(mut self, count: u64, offset: u64) -> Limited<M> {
        self.chain.limit = Some(Limit::with_offset(count, offset));
        Limited { chain: self.chain }
    }

    pub fn filter(mut self, filter: Expr) -> Filtered<M> {
        self.chain.filter = Some(filter);
        Filtered { chain: self.chain }
    }

    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.chain)
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.chain)?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.chain)
    }
}

impl<M: Record> Limited<M> {
    pub fn join<C, K>(
        self,
        field: HasManyField<M, C>,
        on: Col<M, K>,
        equals: Col<C, K>,
    ) -> Joined<M, C>
    where
        C: Record + Clone,
    {
        join_root(self.chain, field, on.name(), equals.name(), None)
    }

    pub fn join_through<P, C, K1, K2>(
        self,
        field: HasManyField<M, C>,
        on: Col<M, K1>,
        pivot_on: Col<P, K1>,
        equals: Col<C, K2>,
        pivot_equals: Col<P, K2>,
    ) -> Joined<M, C>
    where
        P: Record,
        C: Record + Clone,
        K1: Primitive,
        K2: Primitive,
    {
        let pivot = pivot_spec::<P, K1, K2>(pivot_on, pivot_equals);
        join_root(self.chain, field, on.name(), equals.name(), Some(pivot))
    }

    pub fn filter(mut self, filter: Expr) -> Filtered<M> {
        self.chain.filter = Some(filter);
        Filtered { chain: self.chain }
    }

    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.chain)
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.chain)?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.chain)
    }
}

impl<M: Record, F: Record> Joined<M, F> {
    /// Join another child collection: a field of the current focus nests
    /// under it, a field of the root form joins as a sibling.
    pub fn join<P, C, K>(
        self,
        field: HasManyField<P, C>,
        on: Col<P, K>,
        equals: Col<C, K>,
    ) -> Joined<M, C>
    where
        P: Record,
        C: Record + Clone,
    {
        Joined {
            ctx: self.ctx.join(field, on.name(), equals.name(), None),
        }
    }

    pub fn join_through<P2, P, C, K1, K2>(
        self,
        field: HasManyField<P, C>,
        on: Col<P, K1>,
        pivot_on: Col<P2, K1>,
        equals: Col<C, K2>,
        pivot_equals: Col<P2, K2>,
    ) -> Joined<M, C>
    where
        P2: Record,
        P: Record,
        C: Record + Clone,
        K1: Primitive,
        K2: Primitive,
    {
        let pivot = pivot_spec::<P2, K1, K2>(pivot_on, pivot_equals);
        Joined {
            ctx: self.ctx.join(field, on.name(), equals.name(), Some(pivot)),
        }
    }

    /// Order the joined child collection.
    pub fn order(mut self, order: Order<F>) -> Joined<M, F> {
        self.ctx
            .chain
            .push_focus_order(self.ctx.spec, order.column, order.direction);
        self
    }

    /// Limit the joined child collection.
    pub fn limit(mut self, count: u64) -> JoinedLimited<M, F> {
        self.ctx
            .chain
            .set_focus_limit(self.ctx.spec, Limit::new(count));
        JoinedLimited { ctx: self.ctx }
    }

    pub fn limit_offset(mut self, count: u64, offset: u64) -> JoinedLimited<M, F> {
        self.ctx
            .chain
            .set_focus_limit(self.ctx.spec, Limit::with_offset(count, offset));
        JoinedLimited { ctx: self.ctx }
    }

    pub fn filter(self, filter: Expr) -> Filtered<M> {
        let mut chain = self.ctx.into_chain();
        chain.filter = Some(filter);
        Filtered { chain }
    }

    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.ctx.into_chain())
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.ctx.into_chain())?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.ctx.into_chain())
    }
}

impl<M: Record, F: Record> JoinedLimited<M, F> {
    pub fn join<P, C, K>(
        self,
        field: HasManyField<P, C>,
        on: Col<P, K>,
        equals: Col<C, K>,
    ) -> Joined<M, C>
    where
        P: Record,
        C: Record + Clone,
    {
        Joined {
            ctx: self.ctx.join(field, on.name(), equals.name(), None),
        }
    }

    pub fn join_through<P2, P, C, K1, K2>(
        self,
        field: HasManyField<P, C>,
        on: Col<P, K1>,
        pivot_on: Col<P2, K1>,
        equals: Col<C, K2>,
        pivot_equals: Col<P2, K2>,
    ) -> Joined<M, C>
    where
        P2: Record,
        P: Record,
        C: Record + Clone,
        K1: Primitive,
        K2: Primitive,
    {
        let pivot = pivot_spec::<P2, K1, K2>(pivot_on, pivot_equals);
        Joined {
            ctx: self.ctx.join(field, on.name(), equals.name(), Some(pivot)),
        }
    }

    pub fn filter(self, filter: Expr) -> Filtered<M> {
        let mut chain = self.ctx.into_chain();
        chain.filter = Some(filter);
        Filtered { chain }
    }

    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.ctx.into_chain())
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.ctx.into_chain())?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.ctx.into_chain())
    }
}

impl<M: Record> Filtered<M> {
    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.chain)
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.chain)?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.chain)
    }
}

impl<M: Record> FilteredTable<M> {
    pub fn select(self, db: &mut Database) -> Result<Vec<M>> {
        engine::select(db, self.chain)
    }

    pub fn first(self, db: &mut Database) -> Result<Option<M>> {
        Ok(engine::select(db, self.chain)?.into_iter().next())
    }

    pub fn count(self, db: &mut Database) -> Result<u64> {
        engine::count(db, self.chain)
    }

    /// Update the matching rows from `record`'s column values.
    pub fn update(self, record: &M) -> UpdateOp<'_, M> {
        UpdateOp::new(self.chain, record)
    }

    /// Delete the matching rows.
    pub fn delete(self, db: &mut Database) -> Result<u64> {
        engine::delete(db, self.chain)
    }
}

impl<M: Record, F: Record> FocusCtx<M, F> {
    /// Fold the pending focus loader into the chain.
    fn into_chain(self) -> Chain<M> {
        let FocusCtx {
            mut chain,
            nested,
            commit,
            ..
        } = self;
        commit(&mut chain, nested);
        chain
    }

    /// Dispatch a follow-up join: the field either belongs to the focus
    /// form (nested join) or to the root form (sibling join). Anything
    /// else is recorded as a construction error.
    fn join<P, C>(
        self,
        field: HasManyField<P, C>,
        on: &'static str,
        equals: &'static str,
        pivot: Option<PivotSpec>,
    ) -> FocusCtx<M, C>
    where
        P: Record,
        C: Record + Clone,
    {
        let field_any: &dyn Any = &field;

        if let Some(&nested_field) = field_any.downcast_ref::<HasManyField<F, C>>() {
            let FocusCtx {
                mut chain,
                nested: parent_nested,
                commit: parent_commit,
                ..
            } = self;

            let spec = chain.push_spec::<F, C>(nested_field.name(), on, equals, pivot);
            FocusCtx {
                chain,
                nested: vec![],
                spec,
                commit: Box::new(move |chain, nested| {
                    let mut parent_nested = parent_nested;
                    if spec != SPEC_NONE {
                        parent_nested.push(Box::new(JoinLoader::new(spec, nested_field, nested)));
                    }
                    parent_commit(chain, parent_nested);
                }),
            }
        } else if let Some(&root_field) = field_any.downcast_ref::<HasManyField<M, C>>() {
            let chain = self.into_chain();
            join_root(chain, root_field, on, equals, pivot).ctx
        } else {
            let mut chain = self.into_chain();
            chain.fail(Error::query(QueryError::UnknownJoinParent { form: P::NAME }));
            FocusCtx {
                chain,
                nested: vec![],
                spec: SPEC_NONE,
                commit: Box::new(|_, _| {}),
            }
        }
    }
}

fn join_root<M, C>(
    mut chain: Chain<M>,
    field: HasManyField<M, C>,
    on: &'static str,
    equals: &'static str,
    pivot: Option<PivotSpec>,
) -> Joined<M, C>
where
    M: Record,
    C: Record + Clone,
{
    let spec = chain.push_spec::<M, C>(field.name(), on, equals, pivot);
    Joined {
        ctx: FocusCtx {
            chain,
            nested: vec![],
            spec,
            commit: Box::new(move |chain, nested| {
                if spec != SPEC_NONE {
                    chain.loaders.push(Box::new(JoinLoader::new(spec, field, nested)));
                }
            }),
        },
    }
}

fn pivot_spec<P, K1, K2>(pivot_on: Col<P, K1>, pivot_equals: Col<P, K2>) -> PivotSpec
where
    P: Record,
    K1: Primitive,
    K2: Primitive,
{
    PivotSpec {
        table: P::TABLE,
        parent_key: pivot_on.name(),
        child_key: pivot_equals.name(),
        parent_key_ty: K1::ty(),
        child_key_ty: K2::ty(),
    }
}

