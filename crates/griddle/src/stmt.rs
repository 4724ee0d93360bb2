//! Statement-level types: values, expressions, and the conversions between
//! Rust field types and Griddle's value system.

pub use griddle_core::stmt::{BinaryOp, Direction, Expr, ExprColumn, Limit, Type, Value};

mod primitive;
pub use primitive::Primitive;
