// src/ports/pagination.rs
use crate::constants::{PAGINATION_MARGIN_PAGES, PAGINATION_RANGE_PAGES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, current: bool },
    Break,
}

/// Page selector. Only exists when there is more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControl {
    page_count: u32,
    current_page: u32,
}

impl PaginationControl {
    /// `None` when there is nothing to paginate
    pub fn new(page_count: u32, current_page: u32) -> Option<Self> {
        if page_count <= 1 {
            return None;
        }
        Some(Self {
            page_count,
            current_page: current_page.clamp(1, page_count),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Page number to emit for a requested page, kept within range
    pub fn request(&self, page: u32) -> u32 {
        page.clamp(1, self.page_count)
    }

    fn shown(&self, page: u32) -> bool {
        let around = PAGINATION_RANGE_PAGES / 2;
        page <= PAGINATION_MARGIN_PAGES
            || page > self.page_count.saturating_sub(PAGINATION_MARGIN_PAGES)
            || page.abs_diff(self.current_page) <= around
    }

    pub fn items(&self) -> Vec<PageItem> {
        let mut items = Vec::new();
        for number in 1..=self.page_count {
            // a single hidden page between two shown ones is cheaper to show than a break
            let lone_gap = number > 1
                && number < self.page_count
                && self.shown(number - 1)
                && self.shown(number + 1);
            if self.shown(number) || lone_gap {
                items.push(PageItem::Page {
                    number,
                    current: number == self.current_page,
                });
            } else if items.last() != Some(&PageItem::Break) {
                items.push(PageItem::Break);
            }
        }
        items
    }

    pub fn render(&self) -> String {
        let mut parts = vec!["‹".to_string()];
        parts.extend(self.items().into_iter().map(|item| match item {
            PageItem::Page { number, current: true } => format!("[{number}]"),
            PageItem::Page { number, .. } => number.to_string(),
            PageItem::Break => "…".to_string(),
        }));
        parts.push("›".to_string());
        parts.join(" ")
    }
}
