//! Fixed-size paging over the filtered results

use crate::constants::PAGE_SIZE;
use std::ops::Range;

/// 1-based page cursor. The page is clamped against the item count on every access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// ceil(count / page_size); zero when there is nothing to show
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Current page, clamped to [1, max(total_pages, 1)]
    pub fn page(&self, count: usize) -> usize {
        self.page.clamp(1, self.total_pages(count).max(1))
    }

    pub fn has_prev(&self, count: usize) -> bool {
        self.page(count) > 1
    }

    pub fn has_next(&self, count: usize) -> bool {
        self.page(count) < self.total_pages(count)
    }

    pub fn next(&mut self, count: usize) {
        self.page = (self.page(count) + 1).min(self.total_pages(count).max(1));
    }

    pub fn prev(&mut self, count: usize) {
        self.page = self.page(count).saturating_sub(1).max(1);
    }

    pub fn set_page(&mut self, page: usize, count: usize) {
        self.page = page;
        self.page = self.page(count);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Bounds of the current page within `count` items
    pub fn range(&self, count: usize) -> Range<usize> {
        let start = ((self.page(count) - 1) * self.page_size).min(count);
        let end = (start + self.page_size).min(count);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let p = Paginator::default();
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(20), 1);
        assert_eq!(p.total_pages(21), 2);
        assert_eq!(p.total_pages(45), 3);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut p = Paginator::default();
        let count = 45;

        p.prev(count);
        assert_eq!(p.page(count), 1);
        assert!(!p.has_prev(count));

        p.next(count);
        p.next(count);
        p.next(count);
        p.next(count);
        assert_eq!(p.page(count), 3);
        assert!(!p.has_next(count));
        assert_eq!(p.range(count), 40..45);

        p.prev(count);
        assert_eq!(p.page(count), 2);
        assert_eq!(p.range(count), 20..40);
    }

    #[test]
    fn test_empty_set_stays_on_first_page() {
        let mut p = Paginator::default();
        p.next(0);
        assert_eq!(p.page(0), 1);
        assert_eq!(p.range(0), 0..0);
        assert!(!p.has_next(0));
        assert!(!p.has_prev(0));
    }

    #[test]
    fn test_shrinking_result_set_clamps_page() {
        let mut p = Paginator::default();
        p.set_page(5, 100);
        assert_eq!(p.page(100), 5);
        // Filters narrowed the results to a single page
        assert_eq!(p.page(7), 1);
        assert_eq!(p.range(7), 0..7);

        p.set_page(99, 100);
        assert_eq!(p.page(100), 5);

        p.reset();
        assert_eq!(p.page(100), 1);
    }
}
