pub mod driver;
pub use driver::{Capability, Connection};

mod error;
pub use error::{
    DecodeError, EncodeError, Error, QueryError, SchemaError, SqlGenError,
};

pub mod schema;

pub mod stmt;

/// A Result type alias that uses Griddle's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
