//! DTOs shaped for list pages.

use serde::Serialize;

use crate::domain::filter::FilterState;
use crate::domain::sort::SortState;
use crate::pagination::{PageState, Paginated};

/// Query parameters accepted by the list page services.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Selected category tab.
    pub category: Option<String>,
    pub status: Option<String>,
    pub sort: Option<SortState>,
}

impl ListRequest {
    pub fn filter(&self) -> FilterState {
        FilterState {
            query: self.search.clone().unwrap_or_default(),
            category: self.category.clone(),
            status: self.status.clone(),
        }
    }
}

/// Data required to render a list table and its pagination controls.
#[derive(Debug, Serialize)]
pub struct ListPageData<T> {
    #[serde(flatten)]
    pub paginated: Paginated<T>,
    pub total_items: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// 1-based position of the first row shown, absent for an empty page.
    pub first_item: Option<usize>,
    pub last_item: Option<usize>,
    /// Filter echoed back so the template can keep the inputs filled.
    pub filter: FilterState,
    pub sort: Option<SortState>,
}

impl<T> ListPageData<T> {
    pub fn new(
        items: Vec<T>,
        state: &PageState,
        max_visible: usize,
        filter: FilterState,
        sort: Option<SortState>,
    ) -> Self {
        let range = state.item_range();
        Self {
            paginated: Paginated::from_state(items, state, max_visible),
            total_items: state.total_items(),
            page_size: state.page_size(),
            has_previous: state.has_previous(),
            has_next: state.has_next(),
            first_item: range.map(|(first, _)| first),
            last_item: range.map(|(_, last)| last),
            filter,
            sort,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.paginated.items
    }

    /// Footer text such as `Showing 11-20 of 35`.
    pub fn summary(&self) -> String {
        match (self.first_item, self.last_item) {
            (Some(first), Some(last)) => {
                format!("Showing {first}-{last} of {}", self.total_items)
            }
            _ => "No results.".to_string(),
        }
    }
}
