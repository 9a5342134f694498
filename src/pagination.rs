//! Page-state arithmetic and the windowed page strip shown under list tables.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
pub const DEFAULT_MAX_VISIBLE_PAGES: usize = 5;

/// Smallest window that still leaves room for a middle page between the
/// first and last one.
const MIN_VISIBLE_PAGES: usize = 3;

pub const ELLIPSIS_BEFORE: &str = "ellipsis-before";
pub const ELLIPSIS_AFTER: &str = "ellipsis-after";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

/// One entry of the rendered page strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageToken {
    Page { number: usize },
    Ellipsis { id: &'static str },
}

impl PageToken {
    pub fn page(number: usize) -> Self {
        PageToken::Page { number }
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self, PageToken::Ellipsis { .. })
    }

    /// Page number for concrete pages, `None` for ellipses.
    pub fn number(&self) -> Option<usize> {
        match self {
            PageToken::Page { number } => Some(*number),
            PageToken::Ellipsis { .. } => None,
        }
    }
}

/// Computes the page strip for `current_page` out of `total_pages`.
///
/// When every page fits into `max_visible` slots all pages are listed.
/// Otherwise the strip holds the first and last page plus the window
/// `current - 1 ..= current + 1`, pinned to `2..=4` near the start and
/// `total - 3..=total - 1` near the end, with an ellipsis on each side of the
/// window that does not touch the boundary pages. Strips narrower than five
/// slots shrink the window to `max_visible - 2` pages.
pub fn compute_page_window(
    current_page: usize,
    total_pages: usize,
    max_visible: usize,
) -> Vec<PageToken> {
    if total_pages == 0 {
        return vec![PageToken::page(1)];
    }

    let max_visible = max_visible.max(MIN_VISIBLE_PAGES);
    if total_pages <= max_visible {
        return (1..=total_pages).map(PageToken::page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let (start, end) = if max_visible >= DEFAULT_MAX_VISIBLE_PAGES {
        centered_window(current, total_pages)
    } else {
        narrow_window(current, total_pages, max_visible - 2)
    };

    let mut pages = Vec::with_capacity(max_visible + 2);
    pages.push(PageToken::page(1));
    if start > 2 {
        pages.push(PageToken::Ellipsis {
            id: ELLIPSIS_BEFORE,
        });
    }
    pages.extend((start..=end).map(PageToken::page));
    if end < total_pages - 1 {
        pages.push(PageToken::Ellipsis { id: ELLIPSIS_AFTER });
    }
    pages.push(PageToken::page(total_pages));

    pages
}

/// `current ± 1`, pinned to the edges. Requires `total_pages > 5`.
fn centered_window(current: usize, total_pages: usize) -> (usize, usize) {
    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(total_pages - 1);
    if current <= 2 {
        end = 4;
    }
    if current >= total_pages - 1 {
        start = total_pages - 3;
    }
    (start, end)
}

/// Window of `width` pages around `current`. Requires
/// `total_pages > width + 2`, which keeps both adjustments inside
/// `2..=total_pages - 1`.
fn narrow_window(current: usize, total_pages: usize, width: usize) -> (usize, usize) {
    let before = (width - 1) / 2;
    let mut start = current.saturating_sub(before).max(2);
    let mut end = start + width - 1;
    if end > total_pages - 1 {
        end = total_pages - 1;
        start = end + 1 - width;
    }
    (start, end)
}

/// Snapshot of a list view's pagination.
///
/// Invariant: `1 <= current_page <= max(total_pages, 1)` and `page_size > 0`.
/// Values are replaced wholesale on every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize);
        }
        Ok(Self {
            current_page: 1,
            page_size,
            total_items: 0,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Highest page that may be selected; an empty list still shows page 1.
    pub fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Number of items preceding the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// 1-based positions of the first and last item on the current page.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.offset() >= self.total_items {
            return None;
        }
        let first = self.offset() + 1;
        let last = (self.offset() + self.page_size).min(self.total_items);
        Some((first, last))
    }

    /// Index range of the current page within a fully materialized
    /// collection of `total_items` elements.
    pub fn slice_bounds(&self) -> std::ops::Range<usize> {
        let start = self.offset().min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn window(&self, max_visible: usize) -> Vec<PageToken> {
        compute_page_window(self.current_page, self.total_pages(), max_visible)
    }

    fn with_page(self, current_page: usize) -> Self {
        Self {
            current_page,
            ..self
        }
    }

    /// Rebuilds the state with new sizing, pulling the current page back into
    /// range when it no longer exists.
    fn resized(self, page_size: usize, total_items: usize) -> Self {
        let next = Self {
            page_size,
            total_items,
            ..self
        };
        next.with_page(next.current_page.min(next.last_page()))
    }
}

type PageListener = Box<dyn FnMut(&PageState)>;

/// Owns a [`PageState`] and notifies subscribers whenever it changes.
///
/// Every method clamps instead of failing, so stale clicks (a second "next"
/// on the last page, a page link from before the list shrank) are no-ops.
/// Methods return the new state when a transition happened.
pub struct PaginationController {
    state: PageState,
    listeners: Vec<PageListener>,
}

impl fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationController")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PaginationController {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        Ok(Self {
            state: PageState::new(page_size)?,
            listeners: Vec::new(),
        })
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Registers a callback invoked with every new state.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PageState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<PageState> {
        if page < 1 || page > self.state.last_page() {
            log::debug!(
                "Ignoring page {page} outside 1..={}",
                self.state.last_page()
            );
            return None;
        }
        self.replace(self.state.with_page(page))
    }

    pub fn next_page(&mut self) -> Option<PageState> {
        self.go_to_page(self.state.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<PageState> {
        self.go_to_page(self.state.current_page.saturating_sub(1))
    }

    /// Changes the page size. A zero size is rejected and leaves the state
    /// untouched.
    pub fn set_page_size(
        &mut self,
        page_size: usize,
    ) -> Result<Option<PageState>, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize);
        }
        Ok(self.replace(self.state.resized(page_size, self.state.total_items)))
    }

    /// Records the size of the (filtered or server-reported) result set.
    pub fn set_total_items(&mut self, total_items: usize) -> Option<PageState> {
        self.replace(self.state.resized(self.state.page_size, total_items))
    }

    /// Returns to the first page, as after a filter change.
    pub fn reset(&mut self) -> Option<PageState> {
        self.replace(self.state.with_page(1))
    }

    fn replace(&mut self, next: PageState) -> Option<PageState> {
        if next == self.state {
            return None;
        }
        self.state = next;
        for listener in &mut self.listeners {
            listener(&next);
        }
        Some(next)
    }
}

/// One page of items together with its page strip.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<PageToken>,
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        Self::with_max_visible(items, current_page, total_pages, DEFAULT_MAX_VISIBLE_PAGES)
    }

    pub fn with_max_visible(
        items: Vec<T>,
        current_page: usize,
        total_pages: usize,
        max_visible: usize,
    ) -> Self {
        let current_page = current_page.clamp(1, total_pages.max(1));
        let pages = compute_page_window(current_page, total_pages, max_visible);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
        }
    }

    pub fn from_state(items: Vec<T>, state: &PageState, max_visible: usize) -> Self {
        Self::with_max_visible(items, state.current_page, state.total_pages(), max_visible)
    }
}
