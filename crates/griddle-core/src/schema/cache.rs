use super::Table;
use crate::Result;

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Process-wide schema cache, keyed by the record type.
///
/// Entries are populated lazily on first use and never evicted; a
/// primitive column type never changes once derived.
static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<Table>>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<TypeId, Arc<Table>>> {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// The cached schema for `key`, reflecting it with `derive` on first use.
pub fn schema_for(key: TypeId, derive: impl FnOnce() -> Result<Table>) -> Result<Arc<Table>> {
    if let Some(table) = cache().read().expect("schema cache poisoned").get(&key) {
        return Ok(table.clone());
    }

    let table = Arc::new(derive()?);
    let mut entries = cache().write().expect("schema cache poisoned");
    Ok(entries.entry(key).or_insert(table).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;
    use crate::stmt::Type;

    struct Marker;

    #[test]
    fn derives_once() {
        let mut calls = 0;
        for _ in 0..2 {
            let table = schema_for(TypeId::of::<Marker>(), || {
                calls += 1;
                Table::new(
                    "Marker",
                    "markers",
                    vec![Column::new("id", Type::I64, false)],
                    None,
                    vec![],
                )
            })
            .unwrap();
            assert_eq!(table.name, "markers");
        }
        assert_eq!(calls, 1);
    }
}
