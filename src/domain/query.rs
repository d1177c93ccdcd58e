// src/domain/query.rs
use crate::constants::PAGE_SIZE;
use serde::Serialize;

/// Identity of one cacheable list request.
///
/// Constructed only through [`QueryKey::new`], which keeps `page >= 1` and
/// stores the search term trimmed, so two keys describing the same request
/// always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey {
    page: u32,
    per_page: u32,
    search: String,
}

impl QueryKey {
    pub fn new(page: u32, search: &str) -> Self {
        Self::with_page_size(page, PAGE_SIZE, search)
    }

    pub fn with_page_size(page: u32, per_page: u32, search: &str) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            search: search.trim().to_string(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Search term, or `None` when the trimmed input is empty
    pub fn search(&self) -> Option<&str> {
        if self.search.is_empty() {
            None
        } else {
            Some(&self.search)
        }
    }
}
