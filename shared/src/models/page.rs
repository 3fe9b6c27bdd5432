//! Paginated list envelope

use serde::{Deserialize, Serialize};

/// One page of a list endpoint
///
/// `next` / `previous` are page numbers, `None` at either end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of matching rows
    pub count: i64,
    pub page: u32,
    pub limit: u32,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, page: u32, limit: u32) -> Self {
        let shown = i64::from(page) * i64::from(limit);
        let next = (limit > 0 && shown < count).then(|| page + 1);
        let previous = (page > 1).then(|| page - 1);
        Self {
            count,
            page,
            limit,
            next,
            previous,
            results,
        }
    }
}
