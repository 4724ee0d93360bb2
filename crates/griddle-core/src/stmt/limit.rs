/// Pagination attached to a statement or to a single join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub limit: u64,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            offset: None,
        }
    }

    pub fn with_offset(limit: u64, offset: u64) -> Self {
        Self {
            limit,
            offset: Some(offset),
        }
    }
}
