//! List view state and the services that load list pages.

use std::marker::PhantomData;

use crate::domain::filter::FilterState;
use crate::domain::sort::SortState;
use crate::dto::list::{ListPageData, ListRequest};
use crate::models::config::ListingConfig;
use crate::pagination::{PageState, PageToken, PaginationController};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ListQuery, ListSource};
use crate::services::ServiceResult;

/// Number of extra requests issued when a response shows that the current
/// page no longer exists.
const MAX_REFETCHES: usize = 1;

/// A fetch issued for a specific snapshot of the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: ListQuery,
}

impl FetchRequest {
    fn page(&self) -> usize {
        self.query.pagination.map_or(1, |p| p.page)
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows and total were accepted.
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    /// The reported total moved the current page; issue a new request.
    Refetch,
}

/// State of one list table: filters, sort, pagination and the rows of the
/// current page.
///
/// Mutators only change state and report whether anything changed; the owner
/// then calls [`ListView::refresh`], or [`ListView::begin_fetch`] and
/// [`ListView::complete_fetch`] when the source is queried asynchronously.
pub struct ListView<T, S> {
    source: S,
    filter: FilterState,
    sort: Option<SortState>,
    pager: PaginationController,
    max_visible: usize,
    rows: Vec<T>,
    issued: u64,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> ListView<T, S>
where
    S: ListSource<T>,
{
    pub fn new(source: S, config: &ListingConfig) -> ServiceResult<Self> {
        Self::with_page_size(source, config.default_page_size, config.max_visible_pages)
    }

    pub fn with_page_size(source: S, page_size: usize, max_visible: usize) -> ServiceResult<Self> {
        Ok(Self {
            source,
            filter: FilterState::default(),
            sort: None,
            pager: PaginationController::new(page_size)?,
            max_visible,
            rows: Vec::new(),
            issued: 0,
            _item: PhantomData,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn state(&self) -> PageState {
        self.pager.state()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn page_window(&self) -> Vec<PageToken> {
        self.pager.state().window(self.max_visible)
    }

    /// Registers a callback invoked whenever the page state changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PageState) + 'static,
    {
        self.pager.subscribe(listener);
    }

    /// Replaces the search text. Returns `true` when it changed.
    pub fn search(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if self.filter.query == query {
            return false;
        }
        self.filter.query = query;
        self.pager.reset();
        true
    }

    pub fn set_category(&mut self, category: Option<String>) -> bool {
        if self.filter.category == category {
            return false;
        }
        self.filter.category = category;
        self.pager.reset();
        true
    }

    pub fn set_status(&mut self, status: Option<String>) -> bool {
        if self.filter.status == status {
            return false;
        }
        self.filter.status = status;
        self.pager.reset();
        true
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.filter == FilterState::default() {
            return false;
        }
        self.filter = FilterState::default();
        self.pager.reset();
        true
    }

    /// Applies a header click on `field` and returns the resulting sort.
    pub fn toggle_sort(&mut self, field: &str) -> SortState {
        let next = match &self.sort {
            Some(current) => current.toggle(field),
            None => SortState::new(field),
        };
        self.sort = Some(next.clone());
        next
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<PageState> {
        self.pager.go_to_page(page)
    }

    pub fn next_page(&mut self) -> Option<PageState> {
        self.pager.next_page()
    }

    pub fn prev_page(&mut self) -> Option<PageState> {
        self.pager.prev_page()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> ServiceResult<Option<PageState>> {
        self.pager.set_page_size(page_size).map_err(|err| {
            log::warn!("Rejected page size {page_size}: {err}");
            err.into()
        })
    }

    /// Snapshots the current state into a request. Only the most recently
    /// issued request will be accepted by [`ListView::complete_fetch`].
    pub fn begin_fetch(&mut self) -> FetchRequest {
        self.issued += 1;
        FetchRequest {
            generation: self.issued,
            query: self.current_query(),
        }
    }

    fn current_query(&self) -> ListQuery {
        let state = self.pager.state();
        ListQuery::from_state(&self.filter, self.sort.as_ref())
            .paginate(state.current_page(), state.page_size())
    }

    /// Applies the response to `request`.
    ///
    /// Responses to superseded requests, or to requests whose snapshot no
    /// longer matches the view state, are discarded. A failed fetch keeps the
    /// last accepted rows and total.
    pub fn complete_fetch(
        &mut self,
        request: &FetchRequest,
        response: RepositoryResult<(usize, Vec<T>)>,
    ) -> ServiceResult<FetchOutcome> {
        if request.generation != self.issued {
            log::debug!(
                "Discarding response to request #{} superseded by #{}",
                request.generation,
                self.issued
            );
            return Ok(FetchOutcome::Stale);
        }
        if request.query != self.current_query() {
            log::debug!(
                "Discarding response to request #{} issued for an older view state",
                request.generation
            );
            return Ok(FetchOutcome::Stale);
        }

        let (total, rows) = response.map_err(|err| {
            log::error!("Failed to list rows: {err}");
            err
        })?;

        self.pager.set_total_items(total);
        let state = self.pager.state();
        if state.current_page() != request.page() {
            log::debug!(
                "Page {} no longer exists, moving to {}",
                request.page(),
                state.current_page()
            );
            return Ok(FetchOutcome::Refetch);
        }

        self.rows = rows;
        Ok(FetchOutcome::Applied)
    }

    /// Loads the current page from the source.
    ///
    /// Returns [`FetchOutcome::Refetch`] when the reported total kept moving
    /// the current page. The rows are cleared then and the owner should
    /// refresh again.
    pub fn refresh(&mut self) -> ServiceResult<FetchOutcome> {
        for _ in 0..=MAX_REFETCHES {
            let request = self.begin_fetch();
            let response = self.source.list(request.query.clone());
            match self.complete_fetch(&request, response)? {
                FetchOutcome::Refetch => continue,
                outcome => return Ok(outcome),
            }
        }
        log::warn!(
            "Result set kept shrinking; page {} is not loaded",
            self.pager.state().current_page()
        );
        self.rows.clear();
        Ok(FetchOutcome::Refetch)
    }

    pub fn page_data(&self) -> ListPageData<T>
    where
        T: Clone,
    {
        ListPageData::new(
            self.rows.clone(),
            &self.pager.state(),
            self.max_visible,
            self.filter.clone(),
            self.sort.clone(),
        )
    }
}

/// Loads one page for a server-rendered list.
///
/// A page beyond the end of the result set is replaced by the last page.
pub fn load_list_page<T, S>(
    source: &S,
    request: ListRequest,
    config: &ListingConfig,
) -> ServiceResult<ListPageData<T>>
where
    S: ListSource<T> + ?Sized,
{
    let page_size = config.effective_page_size(request.per_page);
    let requested_page = request.page.unwrap_or(1);
    let filter = request.filter();
    let base_query = ListQuery::from_state(&filter, request.sort.as_ref());

    let (total, mut items) = source
        .list(base_query.clone().paginate(requested_page, page_size))
        .map_err(|err| {
            log::error!("Failed to list rows: {err}");
            err
        })?;

    let mut pager = PaginationController::new(page_size)?;
    pager.set_total_items(total);
    let last_page = pager.state().last_page();
    pager.go_to_page(requested_page.clamp(1, last_page));

    let state = pager.state();
    if state.current_page() != requested_page {
        let (total, page_items) = source
            .list(base_query.paginate(state.current_page(), page_size))
            .map_err(|err| {
                log::error!("Failed to list rows: {err}");
                err
            })?;
        pager.set_total_items(total);
        items = page_items;
    }

    Ok(ListPageData::new(
        items,
        &pager.state(),
        config.max_visible_pages,
        filter,
        request.sort,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::function;

    use super::*;
    use crate::domain::client::{Client, ClientStatus};
    use crate::domain::types::{ClientId, DisplayName};
    use crate::repository::errors::RepositoryError;
    use crate::repository::memory::InMemorySource;
    use crate::repository::mock::MockClientSource;
    use crate::repository::Pagination;
    use crate::services::ServiceError;

    fn client(id: i32, name: &str, status: ClientStatus) -> Client {
        Client::new(
            ClientId::new(id).unwrap(),
            DisplayName::new(name).unwrap(),
            None,
            None,
            None,
            status,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    fn clients(count: i32) -> Vec<Client> {
        (1..=count)
            .map(|id| client(id, &format!("Client #{id}"), ClientStatus::Active))
            .collect()
    }

    fn ids(rows: &[Client]) -> Vec<i32> {
        rows.iter().map(|c| c.id.get()).collect()
    }

    #[test]
    fn refresh_loads_first_page() {
        let source = InMemorySource::new(clients(35));
        let mut view = ListView::new(source, &ListingConfig::default()).unwrap();

        view.refresh().unwrap();

        assert_eq!(view.state().total_pages(), 4);
        assert_eq!(ids(view.rows()), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn search_resets_to_first_page() {
        let mut view =
            ListView::new(InMemorySource::new(clients(35)), &ListingConfig::default()).unwrap();
        view.refresh().unwrap();
        view.go_to_page(3);

        assert!(view.search("#1"));
        assert!(!view.search("#1"));
        view.refresh().unwrap();

        assert_eq!(view.state().current_page(), 1);
        assert_eq!(view.state().total_items(), 11);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut view =
            ListView::new(InMemorySource::new(clients(5)), &ListingConfig::default()).unwrap();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        let outcome = view
            .complete_fetch(&first, Ok((1, vec![client(99, "Old", ClientStatus::Active)])))
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(view.rows().is_empty());

        let outcome = view.complete_fetch(&second, Ok((5, clients(5)))).unwrap();
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(view.rows().len(), 5);
    }

    #[test]
    fn response_for_previous_state_is_discarded() {
        let mut view =
            ListView::new(InMemorySource::new(clients(30)), &ListingConfig::default()).unwrap();
        view.refresh().unwrap();

        let request = view.begin_fetch();
        view.next_page();
        let outcome = view.complete_fetch(&request, Ok((30, clients(10)))).unwrap();

        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(view.state().current_page(), 2);
        assert_eq!(ids(view.rows()), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn failed_fetch_keeps_last_good_rows() {
        let mut source = MockClientSource::new();
        let mut calls = 0;
        source.expect_list().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok((3, clients(3)))
            } else {
                Err(RepositoryError::DataSource("timeout".into()))
            }
        });
        let mut view = ListView::new(source, &ListingConfig::default()).unwrap();

        view.refresh().unwrap();
        let result = view.refresh();

        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::DataSource(_)))
        ));
        assert_eq!(view.rows().len(), 3);
        assert_eq!(view.state().total_items(), 3);
    }

    #[test]
    fn shrinking_total_triggers_one_refetch() {
        let mut source = MockClientSource::new();
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.pagination == Some(Pagination { page: 1, per_page: 10 })
            }))
            .times(1)
            .returning(|_| Ok((40, clients(10))));
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.pagination == Some(Pagination { page: 4, per_page: 10 })
            }))
            .times(1)
            .returning(|_| Ok((12, Vec::new())));
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.pagination == Some(Pagination { page: 2, per_page: 10 })
            }))
            .times(1)
            .returning(|_| Ok((12, clients(12).split_off(10))));

        let mut view = ListView::new(source, &ListingConfig::default()).unwrap();
        view.refresh().unwrap();
        view.go_to_page(4);
        view.refresh().unwrap();

        assert_eq!(view.state().current_page(), 2);
        assert_eq!(ids(view.rows()), vec![11, 12]);
    }

    #[test]
    fn result_set_that_keeps_shrinking_is_reported() {
        let mut source = MockClientSource::new();
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.pagination == Some(Pagination { page: 1, per_page: 10 })
            }))
            .times(1)
            .returning(|_| Ok((40, clients(10))));
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.pagination == Some(Pagination { page: 4, per_page: 10 })
            }))
            .times(1)
            .returning(|_| Ok((30, Vec::new())));
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.pagination == Some(Pagination { page: 3, per_page: 10 })
            }))
            .times(1)
            .returning(|_| Ok((12, Vec::new())));

        let mut view = ListView::new(source, &ListingConfig::default()).unwrap();
        assert_eq!(view.refresh().unwrap(), FetchOutcome::Applied);
        view.go_to_page(4);

        assert_eq!(view.refresh().unwrap(), FetchOutcome::Refetch);
        assert_eq!(view.state().current_page(), 2);
        assert!(view.rows().is_empty());
    }

    #[test]
    fn server_query_carries_filter_and_sort() {
        let mut source = MockClientSource::new();
        source
            .expect_list()
            .with(function(|q: &ListQuery| {
                q.search.as_deref() == Some("acme")
                    && q.status.as_deref() == Some("active")
                    && q.sort == Some(SortState::new("name"))
            }))
            .times(1)
            .returning(|_| Ok((1, vec![client(1, "Acme", ClientStatus::Active)])));

        let mut view = ListView::new(source, &ListingConfig::default()).unwrap();
        view.search("acme");
        view.set_status(Some("active".into()));
        view.toggle_sort("name");
        view.refresh().unwrap();

        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn toggle_sort_flips_then_resets() {
        let mut view: ListView<Client, _> =
            ListView::new(InMemorySource::new(clients(3)), &ListingConfig::default()).unwrap();
        assert_eq!(view.toggle_sort("name"), SortState::new("name"));
        assert_eq!(
            view.toggle_sort("name"),
            SortState::with_order("name", crate::domain::sort::SortOrder::Desc)
        );
        assert_eq!(view.toggle_sort("created_at"), SortState::new("created_at"));
    }

    #[test]
    fn zero_page_size_is_reported() {
        let mut view: ListView<Client, _> =
            ListView::new(InMemorySource::new(clients(3)), &ListingConfig::default()).unwrap();
        assert!(matches!(view.set_page_size(0), Err(ServiceError::Pagination(_))));
        assert_eq!(view.state().page_size(), 10);
    }

    #[test]
    fn load_list_page_moves_past_end_request_to_last_page() {
        let source = InMemorySource::new(clients(35));
        let request = ListRequest {
            page: Some(9),
            ..ListRequest::default()
        };

        let data = load_list_page(&source, request, &ListingConfig::default()).unwrap();

        assert_eq!(data.paginated.page, 4);
        assert_eq!(ids(data.items()), (31..=35).collect::<Vec<_>>());
        assert_eq!(data.summary(), "Showing 31-35 of 35");
    }
}
