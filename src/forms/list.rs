//! Query-string parameters of list pages.

use serde::Deserialize;
use validator::Validate;

use crate::domain::sort::{SortOrder, SortState};
use crate::dto::list::ListRequest;
use crate::forms::FormError;
use crate::models::config::ListingConfig;

/// Raw `?q=&page=&per_page=&category=&status=&sort=&order=` parameters.
///
/// Every field is kept as text so that a mistyped number or an unknown sort
/// order degrades to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub per_page: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

impl ListParams {
    pub fn from_query_str(query: &str) -> Result<Self, FormError> {
        serde_html_form::from_str(query).map_err(|err| FormError::Malformed(err.to_string()))
    }

    /// Parses the query string, falling back to empty parameters when it
    /// cannot be decoded at all.
    pub fn parse(query: &str) -> Self {
        Self::from_query_str(query).unwrap_or_else(|err| {
            log::warn!("Ignoring list parameters: {err}");
            Self::default()
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn positive_number(value: Option<String>) -> Option<usize> {
    let raw = non_blank(value)?;
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            log::debug!("Ignoring non-positive number {raw:?}");
            None
        }
        Ok(number) => Some(number),
    }
}

impl From<ListParams> for ListRequest {
    fn from(params: ListParams) -> Self {
        let order = params
            .order
            .as_deref()
            .and_then(|order| order.parse::<SortOrder>().ok())
            .unwrap_or_default();
        let sort = non_blank(params.sort).map(|field| SortState::with_order(field.trim(), order));

        Self {
            search: non_blank(params.q),
            page: positive_number(params.page),
            per_page: positive_number(params.per_page),
            category: non_blank(params.category),
            status: non_blank(params.status),
            sort,
        }
    }
}

/// "Rows per page" selector submission.
#[derive(Debug, Deserialize, Validate)]
pub struct PageSizeForm {
    #[validate(range(min = 1))]
    pub per_page: usize,
}

impl PageSizeForm {
    /// Returns the page size when it is positive and within the configured
    /// maximum.
    pub fn validated(self, config: &ListingConfig) -> Result<usize, FormError> {
        self.validate()?;
        if !config.allows_page_size(self.per_page) {
            return Err(FormError::InvalidPageSize);
        }
        Ok(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_query_string_is_converted() {
        let params =
            ListParams::parse("q=tech&page=3&per_page=25&status=active&sort=name&order=desc");
        let request = ListRequest::from(params);

        assert_eq!(request.search.as_deref(), Some("tech"));
        assert_eq!(request.page, Some(3));
        assert_eq!(request.per_page, Some(25));
        assert_eq!(request.status.as_deref(), Some("active"));
        assert_eq!(request.category, None);
        assert_eq!(request.sort, Some(SortState::with_order("name", SortOrder::Desc)));
    }

    #[test]
    fn malformed_values_are_dropped() {
        let params =
            ListParams::parse("q=&page=abc&per_page=0&sort=name&order=sideways&category=%20");
        let request = ListRequest::from(params);

        assert_eq!(request.search, None);
        assert_eq!(request.page, None);
        assert_eq!(request.per_page, None);
        assert_eq!(request.category, None);
        assert_eq!(request.sort, Some(SortState::new("name")));
    }

    #[test]
    fn search_term_keeps_inner_whitespace() {
        let request = ListRequest::from(ListParams::parse("q=tech+corp"));
        assert_eq!(request.search.as_deref(), Some("tech corp"));
    }

    #[test]
    fn empty_query_string_yields_defaults() {
        let request = ListRequest::from(ListParams::parse(""));
        assert_eq!(request, ListRequest::default());
    }

    #[test]
    fn page_size_form_enforces_bounds() {
        let config = ListingConfig::default();
        assert_eq!(PageSizeForm { per_page: 25 }.validated(&config).unwrap(), 25);
        assert!(matches!(
            PageSizeForm { per_page: 0 }.validated(&config),
            Err(FormError::Validation(_))
        ));
        assert!(matches!(
            PageSizeForm { per_page: 101 }.validated(&config),
            Err(FormError::InvalidPageSize)
        ));
    }
}
