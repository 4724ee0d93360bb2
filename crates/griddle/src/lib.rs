#[macro_use]
mod log;

mod create;
pub use create::{create_entry, CreatePolicy};

mod db;
pub use db::{Builder, Database};

mod engine;

mod fields;
pub use fields::{Col, HasManyField, Order};

mod query;
pub use query::{
    Filtered, FilteredTable, Joined, JoinedLimited, Limited, Ordered, Query, UpdateOp,
};

mod record;
pub use record::{ChildMeta, Record, Row};

mod relation;
pub use relation::HasMany;

pub mod stmt;

pub use griddle_core::{
    driver, schema, DecodeError, EncodeError, Error, QueryError, Result, SchemaError,
    SqlGenError,
};

/// Derive [`Record`] for a struct.
///
/// Column fields are supported primitives or `Option` of one; child
/// collection fields are [`HasMany`]. Attributes: `#[table("name")]` on the
/// struct, `#[key]` and `#[column("name")]` on fields.
pub use griddle_macros::Record;
