//! Offset/limit window for list operations.

use crate::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET, MAX_PAGE_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    /// Build a window, capping `limit` at [`MAX_PAGE_LIMIT`].
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: limit.min(MAX_PAGE_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: DEFAULT_PAGE_OFFSET,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
