//! Pagination params

use serde::{Deserialize, Serialize};

/// Offset/limit window over the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginate {
    pub offset: i64,
    pub limit: i64,
}

pub fn paginate(offset: i64, limit: i64) -> Paginate {
    Paginate { offset, limit }
}
