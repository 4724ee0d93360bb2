mod expr;
pub use expr::{Expr, ExprColumn};

mod limit;
pub use limit::Limit;

mod op;
pub use op::BinaryOp;

mod order_by;
pub use order_by::Direction;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
