//! Pagination arithmetic
//!
//! This module computes page counts and offsets from result totals. Page
//! indexes are zero-based everywhere.

/// A page request: zero-based index plus page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(index: u32, size: u32) -> Self {
        Self { index, size }
    }

    /// First page with the default size
    pub fn first() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }

    /// Row offset of this page
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Number of pages needed for `total` rows.
///
/// An empty result still has one (empty) page, so navigation always has a
/// valid page to land on. A zero page size is treated as one row per page.
pub fn page_count(total: i64, page_size: u32) -> u32 {
    let total = total.max(0) as u64;
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    pages.min(u64::from(u32::MAX)) as u32
}

/// Clamp a requested page index into `0..page_count`
pub fn clamp_page_index(index: u32, page_count: u32) -> u32 {
    index.min(page_count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Page Counting
    // ========================================

    #[test]
    fn empty_result_still_has_one_page() {
        assert_eq!(page_count(0, 25), 1);
    }

    #[test]
    fn partial_last_page_counts_as_a_page() {
        assert_eq!(page_count(30, 25), 2);
        assert_eq!(page_count(26, 25), 2);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(page_count(50, 25), 2);
        assert_eq!(page_count(25, 25), 1);
    }

    #[test]
    fn single_row_is_one_page() {
        assert_eq!(page_count(1, 25), 1);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        assert_eq!(page_count(-5, 25), 1);
        assert_eq!(page_count(10, 0), 10);
    }

    // ========================================
    // Index Clamping and Offsets
    // ========================================

    #[test]
    fn out_of_range_index_clamps_to_last_page() {
        assert_eq!(clamp_page_index(5, 2), 1);
        assert_eq!(clamp_page_index(1, 2), 1);
        assert_eq!(clamp_page_index(0, 2), 0);
    }

    #[test]
    fn clamping_against_zero_pages_stays_at_zero() {
        assert_eq!(clamp_page_index(3, 0), 0);
    }

    #[test]
    fn offset_is_index_times_size() {
        assert_eq!(PageRequest::new(0, 25).offset(), 0);
        assert_eq!(PageRequest::new(2, 25).offset(), 50);
        // Large pages do not overflow
        assert_eq!(
            PageRequest::new(u32::MAX, u32::MAX).offset(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn first_page_uses_the_default_size() {
        let page = PageRequest::first();
        assert_eq!(page.index, 0);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
    }
}
