//! Page slicing

use serde::Serialize;

use crate::slip::Slip;

/// Slice for 1-based `page` of `size` items. Out-of-range pages, page 0 and
/// size 0 give an empty page.
pub fn paginate(slips: &[Slip], page: usize, size: usize) -> Vec<Slip> {
    if page == 0 || size == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(size);
    if start >= slips.len() {
        return Vec::new();
    }
    let end = start.saturating_add(size).min(slips.len());
    slips[start..end].to_vec()
}

/// Number of pages needed for `total` items, never less than 1
pub fn total_pages(total: usize, size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    total.div_ceil(size).max(1)
}

/// Pagination summary for a derived view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// 1-based index of the first row shown, 0 when the page is empty
    pub showing_start: usize,
    /// 1-based index of the last row shown, 0 when the page is empty
    pub showing_end: usize,
    pub total_filtered: usize,
    pub total_all: usize,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total_filtered: usize, total_all: usize) -> Self {
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let (showing_start, showing_end) = if page == 0 || page_size == 0 || start >= total_filtered {
            (0, 0)
        } else {
            (start + 1, (start + page_size).min(total_filtered))
        };

        Self {
            page,
            page_size,
            total_pages: total_pages(total_filtered, page_size),
            showing_start,
            showing_end,
            total_filtered,
            total_all,
        }
    }

    /// Whether the filtered view is a strict subset of the collection
    pub fn is_filtered(&self) -> bool {
        self.total_filtered != self.total_all
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Slip> {
        (0..n)
            .map(|i| Slip {
                id: format!("s{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_pages_cover_every_slip_exactly_once() {
        for n in [0usize, 1, 9, 10, 11, 37] {
            for size in [1usize, 3, 10, 25] {
                let slips = numbered(n);
                let pages = if n == 0 { 0 } else { n.div_ceil(size) };

                let mut joined = Vec::new();
                for page in 1..=pages {
                    let chunk = paginate(&slips, page, size);
                    assert!(!chunk.is_empty());
                    joined.extend(chunk);
                }
                assert_eq!(joined, slips, "n={} size={}", n, size);
                assert!(paginate(&slips, pages + 1, size).is_empty());
            }
        }
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let slips = numbered(5);
        assert!(paginate(&slips, 0, 10).is_empty());
        assert!(paginate(&slips, 3, 2).len() == 1);
        assert!(paginate(&slips, 4, 2).is_empty());
        assert!(paginate(&slips, 1, 0).is_empty());
        assert!(paginate(&slips, usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(2, 10, 25, 40);
        assert_eq!(info.total_pages, 3);
        assert_eq!((info.showing_start, info.showing_end), (11, 20));
        assert!(info.is_filtered());
        assert!(info.has_previous() && info.has_next());

        let last = PageInfo::new(3, 10, 25, 25);
        assert_eq!((last.showing_start, last.showing_end), (21, 25));
        assert!(!last.has_next());

        let empty = PageInfo::new(1, 10, 0, 0);
        assert_eq!(empty.total_pages, 1);
        assert_eq!((empty.showing_start, empty.showing_end), (0, 0));
    }
}
