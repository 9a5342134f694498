use crate::domain::filter::FilterState;
use crate::domain::sort::SortState;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Request handed to a [`ListSource`].
///
/// Mirrors the parameters a paginated REST endpoint accepts:
/// `{ page, per_page, search, category, status, sort, order }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub sort: Option<SortState>,
    pub pagination: Option<Pagination>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the query for the given view state. Blank search terms are
    /// omitted.
    pub fn from_state(filter: &FilterState, sort: Option<&SortState>) -> Self {
        let mut query = Self::new();
        if !filter.query.trim().is_empty() {
            query = query.search(filter.query.clone());
        }
        if let Some(category) = &filter.category {
            query = query.category(category.clone());
        }
        if let Some(status) = &filter.status {
            query = query.status(status.clone());
        }
        query.sort = sort.cloned();
        query
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Filter portion of the query.
    pub fn filter(&self) -> FilterState {
        FilterState {
            query: self.search.clone().unwrap_or_default(),
            category: self.category.clone(),
            status: self.status.clone(),
        }
    }
}

/// Supplies list rows to a view.
///
/// Returns the total number of rows matching the query together with the
/// requested page (all matching rows when the query is not paginated). An
/// in-memory collection and a paginated REST endpoint both fit behind it.
pub trait ListSource<T> {
    fn list(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<T>)>;
}

impl<T, S> ListSource<T> for &S
where
    S: ListSource<T> + ?Sized,
{
    fn list(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<T>)> {
        (**self).list(query)
    }
}
