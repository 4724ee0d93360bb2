#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod expr;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

mod statement;

use crate::stmt::Statement;

use griddle_core::driver::Capability;

/// Serialize a statement to a SQL string.
///
/// Quoting, placeholder syntax, and storage type keywords are delegated to
/// the driver's [`Capability`]. Literal values are not rendered inline;
/// each one is pushed into `params` and replaced by a positional
/// placeholder, in emission order.
#[derive(Debug)]
pub struct Serializer<'a> {
    capability: &'a Capability,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<'a> Serializer<'a> {
    pub fn new(capability: &'a Capability) -> Self {
        Self { capability }
    }

    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }
}
