//! Page arithmetic shared by the directory core and the templates.

use serde::Serialize;

/// Pages shown at each edge of the pager.
const EDGE_PAGES: usize = 2;
/// Pages shown before and after the current one.
const AROUND_CURRENT: usize = 2;

/// Clamps a requested page into `[1, total_pages]`.
///
/// An unknown or zero page count clamps everything to the first page.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Builds the pager entries; `None` marks a gap between runs of pages.
///
/// Only the visible runs are walked, so huge page counts cost nothing.
fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + EDGE_PAGES).min(last_page.saturating_add(1));
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(AROUND_CURRENT));
    let mid_end = current_page
        .saturating_add(AROUND_CURRENT + 1)
        .min(last_page.saturating_add(1));

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(EDGE_PAGES) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// A page of items together with the pager state the templates need.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let total_pages = total_pages.max(1);
        let page = clamp_page(current_page, total_pages);

        Self {
            items,
            pages: page_window(total_pages, page),
            page,
            total_pages,
            previous: (page > 1).then(|| page - 1),
            next: (page < total_pages).then(|| page + 1),
        }
    }
}
