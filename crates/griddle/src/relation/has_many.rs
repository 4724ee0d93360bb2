use std::fmt;

/// A child collection field.
///
/// The collection starts out absent and becomes loaded only when the query
/// joins the field: an unjoined field stays `None`, a joined field with no
/// matching rows is `Some` of an empty slice.
#[derive(Clone, PartialEq)]
pub struct HasMany<T> {
    values: Option<Vec<T>>,
}

impl<T> HasMany<T> {
    /// A loaded collection holding `values`.
    pub fn loaded(values: Vec<T>) -> Self {
        Self {
            values: Some(values),
        }
    }

    /// The loaded rows, or `None` when the field was never joined.
    pub fn get(&self) -> Option<&[T]> {
        self.values.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.values.is_some()
    }
}

impl<T> Default for HasMany<T> {
    fn default() -> Self {
        Self { values: None }
    }
}

impl<T: fmt::Debug> fmt::Debug for HasMany<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.values {
            Some(values) => fmt.debug_list().entries(values).finish(),
            None => fmt.write_str("<not loaded>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_absent() {
        let rel: HasMany<i32> = HasMany::default();
        assert!(!rel.is_loaded());
        assert_eq!(rel.get(), None);
    }

    #[test]
    fn loaded_empty_is_not_absent() {
        let rel: HasMany<i32> = HasMany::loaded(vec![]);
        assert!(rel.is_loaded());
        assert_eq!(rel.get(), Some(&[][..]));
    }
}
