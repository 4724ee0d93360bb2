mod cache;
pub use cache::schema_for;

mod column;
pub use column::Column;

mod table;
pub use table::{ChildCollection, Table};
