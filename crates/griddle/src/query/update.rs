use super::chain::Chain;
use crate::db::Database;
use crate::engine;
use crate::fields::Col;
use crate::record::Record;
use crate::Result;

/// A pending update built from a record's column values.
///
/// By default every column except the primary key is assigned. `set`
/// narrows the assignment to the named columns; `ignore` drops columns
/// from the default set. The primary key is always excluded.
pub struct UpdateOp<'a, M: Record> {
    chain: Chain<M>,
    record: &'a M,
    set_keys: Vec<&'static str>,
    ignore_keys: Vec<&'static str>,
}

impl<'a, M: Record> UpdateOp<'a, M> {
    pub(crate) fn new(chain: Chain<M>, record: &'a M) -> Self {
        Self {
            chain,
            record,
            set_keys: vec![],
            ignore_keys: vec![],
        }
    }

    /// Assign only the named columns. May be called repeatedly.
    pub fn set<V>(mut self, column: Col<M, V>) -> Self {
        self.set_keys.push(column.name());
        self
    }

    /// Leave the named column out of the default assignment set.
    pub fn ignore<V>(mut self, column: Col<M, V>) -> Self {
        self.ignore_keys.push(column.name());
        self
    }

    pub fn exec(self, db: &mut Database) -> Result<u64> {
        engine::update(db, self.chain, self.record, &self.set_keys, &self.ignore_keys)
    }
}
