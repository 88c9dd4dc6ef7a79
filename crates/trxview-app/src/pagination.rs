// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_MAX_PAGE_BUTTONS: usize = 5;

/// Slice bounds for one page. `end` is not clamped; use [`PageBounds::clamp`]
/// before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub start: usize,
    pub end: usize,
    pub total_pages: usize,
}

impl PageBounds {
    pub fn clamp(&self, total_items: usize) -> Range<usize> {
        let start = self.start.min(total_items);
        let end = self.end.min(total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.clamp(items.len())]
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

pub fn paginate(total_items: usize, page_size: usize, current_page: usize) -> PageBounds {
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    PageBounds {
        start,
        end: start.saturating_add(page_size),
        total_pages: total_pages(total_items, page_size),
    }
}

/// Page numbers offered for direct navigation, centered on `current_page`
/// where the range allows.
pub fn page_window(current_page: usize, total_pages: usize, max_buttons: usize) -> Vec<usize> {
    let start = current_page.saturating_sub(max_buttons / 2).max(1);
    let end = total_pages.min(start.saturating_add(max_buttons).saturating_sub(1));
    (start..=end).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationController {
    page_size: usize,
    max_buttons: usize,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGE_BUTTONS)
    }
}

impl PaginationController {
    pub const fn new(page_size: usize, max_buttons: usize) -> Self {
        Self {
            page_size,
            max_buttons,
        }
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub const fn max_buttons(&self) -> usize {
        self.max_buttons
    }

    pub fn paginate(&self, total_items: usize, current_page: usize) -> PageBounds {
        paginate(total_items, self.page_size, current_page)
    }

    pub fn page_window(&self, current_page: usize, total_pages: usize) -> Vec<usize> {
        page_window(current_page, total_pages, self.max_buttons)
    }

    pub fn nav(&self, total_items: usize, current_page: usize) -> PageNav {
        let bounds = self.paginate(total_items, current_page);
        PageNav {
            current_page,
            total_pages: bounds.total_pages,
            window: self.page_window(current_page, bounds.total_pages),
            first_index: bounds.start,
            has_previous: current_page > 1,
            has_next: current_page < bounds.total_pages,
        }
    }
}

/// Navigation metadata for one browsing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNav {
    pub current_page: usize,
    pub total_pages: usize,
    pub window: Vec<usize>,
    pub first_index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageNav {
    pub fn accepts(&self, page: usize) -> bool {
        (1..=self.total_pages).contains(&page)
    }
}

#[cfg(test)]
mod tests {
    use super::{PaginationController, page_window, paginate, total_pages};

    #[test]
    fn paginate_first_and_last_pages() {
        let first = paginate(23, 10, 1);
        assert_eq!((first.start, first.end, first.total_pages), (0, 10, 3));
        assert_eq!(first.clamp(23), 0..10);

        let last = paginate(23, 10, 3);
        assert_eq!((last.start, last.end), (20, 30));
        assert_eq!(last.clamp(23), 20..23);
    }

    #[test]
    fn out_of_range_page_yields_empty_slice() {
        let items: Vec<u32> = (0..12).collect();
        let bounds = paginate(items.len(), 10, 5);
        assert!(bounds.slice(&items).is_empty());
        assert_eq!(paginate(12, 10, 2).slice(&items), &[10, 11]);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        assert_eq!(paginate(0, 10, 1).total_pages, 0);
        assert_eq!(total_pages(0, 10), 0);
        assert!(page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn zero_page_size_is_harmless() {
        assert_eq!(total_pages(50, 0), 0);
        let bounds = paginate(50, 0, 3);
        assert!(bounds.clamp(50).is_empty());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn window_clips_at_both_ends() {
        assert_eq!(page_window(1, 3, 5), vec![1, 2, 3]);
        assert_eq!(page_window(7, 10, 5), vec![5, 6, 7, 8, 9]);
        assert_eq!(page_window(10, 10, 5), vec![8, 9, 10]);
        assert_eq!(page_window(2, 10, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn window_saturates_at_extreme_inputs() {
        assert_eq!(
            page_window(usize::MAX, usize::MAX, 5),
            vec![usize::MAX - 2, usize::MAX - 1, usize::MAX]
        );
        assert_eq!(page_window(3, 4, usize::MAX), vec![1, 2, 3, 4]);
        assert!(page_window(usize::MAX, 4, usize::MAX).is_empty());

        let nav = PaginationController::new(1, 5).nav(usize::MAX, usize::MAX);
        assert_eq!(nav.window.len(), 3);
        assert!(!nav.has_next);
    }

    #[test]
    fn stale_cursor_window_is_empty() {
        assert!(page_window(9, 2, 5).is_empty());
    }

    #[test]
    fn nav_disables_arrows_at_edges() {
        let controller = PaginationController::default();

        let empty = controller.nav(0, 1);
        assert!(!empty.has_previous);
        assert!(!empty.has_next);
        assert!(empty.window.is_empty());
        assert!(!empty.accepts(1));

        let middle = controller.nav(35, 2);
        assert!(middle.has_previous);
        assert!(middle.has_next);
        assert_eq!(middle.first_index, 10);
        assert!(middle.accepts(4));
        assert!(!middle.accepts(5));
        assert!(!middle.accepts(0));

        let last = controller.nav(35, 4);
        assert!(last.has_previous);
        assert!(!last.has_next);
    }
}
