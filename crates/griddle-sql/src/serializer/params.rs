use super::{Formatter, ToSql};

use griddle_core::stmt::Value;

/// Sink for positional parameters collected during serialization.
pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// The zero-based index a pushed parameter landed on.
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len() - 1)
    }
}

impl ToSql for Placeholder {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let text = f.serializer.capability.placeholder(self.0);
        f.dst.push_str(&text);
    }
}
