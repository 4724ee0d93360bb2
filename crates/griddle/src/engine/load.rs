use super::{lower, ExecCx};
use crate::fields::HasManyField;
use crate::record::Record;
use crate::{Error, Result, SqlGenError};

use griddle_core::stmt::Value;

use crate::query::chain::JoinSpec;

/// The child-load protocol for one join, erased over the child type so a
/// chain can hold loaders for heterogeneous joins.
///
/// `P` is the population the children stitch onto: the root form for
/// root-level joins, the outer child form for nested ones.
pub(crate) trait ChildLoad<P: Record> {
    fn load(&self, cx: &mut ExecCx<'_>, specs: &[JoinSpec], parents: &mut Vec<P>) -> Result<()>;
}

/// Typed loader for a join of `C` rows onto `P` parents.
pub(crate) struct JoinLoader<P: Record, C: Record> {
    spec: usize,
    field: HasManyField<P, C>,
    nested: Vec<Box<dyn ChildLoad<C>>>,
}

impl<P: Record, C: Record> JoinLoader<P, C> {
    pub(crate) fn new(
        spec: usize,
        field: HasManyField<P, C>,
        nested: Vec<Box<dyn ChildLoad<C>>>,
    ) -> Self {
        Self {
            spec,
            field,
            nested,
        }
    }
}

impl<P: Record, C: Record + Clone> ChildLoad<P> for JoinLoader<P, C> {
    fn load(&self, cx: &mut ExecCx<'_>, specs: &[JoinSpec], parents: &mut Vec<P>) -> Result<()> {
        if parents.is_empty() {
            return Ok(());
        }

        let spec = &specs[self.spec];
        let parent_schema = P::schema()?;
        let child_schema = C::schema()?;

        let Some(parent_key_index) = parent_schema.column_index(spec.parent_key) else {
            return Err(unknown_column(spec.parent_form, spec.parent_key));
        };
        let Some(child_key_index) = child_schema.column_index(spec.child_key) else {
            return Err(unknown_column(spec.child_form, spec.child_key));
        };

        // Deduplicated parent keys, in first-seen order. Null keys never
        // match and are left out.
        let mut parent_keys: Vec<Value> = vec![];
        for parent in parents.iter() {
            let key = parent.value_at(parent_key_index);
            if !key.is_null() && !parent_keys.contains(&key) {
                parent_keys.push(key);
            }
        }

        if parent_keys.is_empty() {
            return assign_empty(&self.field, parents);
        }

        // Pivot joins resolve the effective child-side key set through the
        // intermediary table first.
        let mut pivot_rows: Option<Vec<Vec<Value>>> = None;
        let in_keys = match &spec.pivot {
            None => parent_keys.clone(),
            Some(pivot) => {
                let rows = cx.rows(
                    &lower::pivot(pivot, parent_keys.clone()),
                    &[pivot.parent_key_ty, pivot.child_key_ty],
                )?;

                let mut child_keys: Vec<Value> = vec![];
                for row in &rows {
                    let key = &row[1];
                    if !key.is_null() && !child_keys.contains(key) {
                        child_keys.push(key.clone());
                    }
                }
                pivot_rows = Some(rows);

                if child_keys.is_empty() {
                    return assign_empty(&self.field, parents);
                }
                child_keys
            }
        };

        let auxiliary = lower::auxiliary(spec, &child_schema, in_keys)?;
        let mut children: Vec<C> = cx.run(&auxiliary)?;

        // Children may have joined fields of their own; they become the
        // parent population of the nested loaders.
        if !children.is_empty() {
            for loader in &self.nested {
                loader.load(cx, specs, &mut children)?;
            }
        }

        let child_keys: Vec<Value> = children
            .iter()
            .map(|child| child.value_at(child_key_index))
            .collect();

        // Bucket by join key and stitch, preserving auxiliary row order.
        for parent in parents.iter_mut() {
            let parent_key = parent.value_at(parent_key_index);
            if parent_key.is_null() {
                self.field.assign(parent, vec![]);
                continue;
            }

            let bucket: Vec<C> = match &pivot_rows {
                None => children
                    .iter()
                    .zip(&child_keys)
                    .filter(|(_, key)| **key == parent_key)
                    .map(|(child, _)| child.clone())
                    .collect(),
                Some(rows) => {
                    // The distinct child set reachable from this parent.
                    let wanted: Vec<&Value> = rows
                        .iter()
                        .filter(|row| row[0] == parent_key)
                        .map(|row| &row[1])
                        .collect();
                    children
                        .iter()
                        .zip(&child_keys)
                        .filter(|(_, key)| wanted.iter().any(|w| *w == *key))
                        .map(|(child, _)| child.clone())
                        .collect()
                }
            };
            self.field.assign(parent, bucket);
        }

        Ok(())
    }
}

fn assign_empty<P: Record, C: Record>(
    field: &HasManyField<P, C>,
    parents: &mut Vec<P>,
) -> Result<()> {
    for parent in parents.iter_mut() {
        field.assign(parent, vec![]);
    }
    Ok(())
}

fn unknown_column(form: &str, column: &str) -> Error {
    Error::sql_gen(SqlGenError::UnknownColumn {
        form: form.to_owned(),
        column: column.to_owned(),
    })
}
