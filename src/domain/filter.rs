//! Search and category/status filtering over in-memory collections.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Exposes the parts of a listed entity the filter looks at.
pub trait Filterable {
    /// Strings eligible for free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Category the entity belongs to, if it is categorized at all.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Lifecycle status of the entity, if it has one.
    fn status(&self) -> Option<&str> {
        None
    }
}

/// User-controlled filter inputs of a list view.
///
/// Deserialization never fails on a field's value: anything that is not a
/// string reads as an empty query or an unset tab.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    #[serde(deserialize_with = "lenient_query")]
    pub query: String,
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(text) => Some(text),
        Loose::Other(_) => None,
    })
}

fn lenient_query<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

impl FilterState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns `true` when no filter narrows the collection.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.category.is_none() && self.status.is_none()
    }

    /// Evaluates the filter against a single item.
    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        matches_query(&self.query, &item.search_fields())
            && matches_exact(self.category.as_deref(), item.category())
            && matches_exact(self.status.as_deref(), item.status())
    }
}

/// Case-insensitive substring search over the provided fields.
///
/// A blank query matches everything. Otherwise the literal query, without
/// trimming, must occur in at least one field.
pub fn matches_query(query: &str, fields: &[&str]) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn matches_exact(expected: Option<&str>, actual: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => actual == Some(expected),
    }
}

/// Builds a reusable predicate from a snapshot of the filter.
pub fn build_predicate<T>(filter: &FilterState) -> impl Fn(&T) -> bool + use<T>
where
    T: Filterable,
{
    let filter = filter.clone();
    move |item: &T| filter.matches(item)
}

/// Builds a predicate that searches the strings returned by `searchable`
/// instead of [`Filterable::search_fields`].
pub fn build_predicate_with<T, F>(filter: &FilterState, searchable: F) -> impl Fn(&T) -> bool
where
    T: Filterable,
    F: Fn(&T) -> Vec<String>,
{
    let filter = filter.clone();
    move |item: &T| {
        let fields = searchable(item);
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        matches_query(&filter.query, &fields)
            && matches_exact(filter.category.as_deref(), item.category())
            && matches_exact(filter.status.as_deref(), item.status())
    }
}

/// Returns the items matching `filter`, preserving their original order.
pub fn apply_filter<'a, T: Filterable>(items: &'a [T], filter: &FilterState) -> Vec<&'a T> {
    if filter.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| filter.matches(*item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Company {
        name: &'static str,
        note: &'static str,
        industry: Option<&'static str>,
        status: &'static str,
    }

    impl Filterable for Company {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.note]
        }

        fn category(&self) -> Option<&str> {
            self.industry
        }

        fn status(&self) -> Option<&str> {
            Some(self.status)
        }
    }

    fn company(name: &'static str, status: &'static str) -> Company {
        Company {
            name,
            note: "",
            industry: None,
            status,
        }
    }

    #[test]
    fn query_and_status_compose() {
        let items = [
            company("TechCorp", "active"),
            company("TechCorp", "inactive"),
            company("Other", "active"),
        ];
        let filter = FilterState::new("tech").status("active");
        let predicate = build_predicate::<Company>(&filter);

        let matched: Vec<bool> = items.iter().map(|item| predicate(item)).collect();

        assert_eq!(matched, vec![true, false, false]);
    }

    #[test]
    fn blank_query_matches_everything() {
        let item = company("Anything", "active");
        assert!(FilterState::new("").matches(&item));
        assert!(FilterState::new("   ").matches(&item));
    }

    #[test]
    fn search_is_case_insensitive_and_spans_fields() {
        let item = Company {
            name: "Acme",
            note: "Prefers EMAIL contact",
            industry: None,
            status: "active",
        };
        assert!(FilterState::new("email").matches(&item));
        assert!(FilterState::new("ACME").matches(&item));
        assert!(!FilterState::new("phone").matches(&item));
    }

    #[test]
    fn non_blank_query_is_not_trimmed() {
        let item = company("TechCorp", "active");
        assert!(!FilterState::new(" tech").matches(&item));
        assert!(FilterState::new("ch").matches(&item));
    }

    #[test]
    fn category_requires_exact_match() {
        let mut item = company("Acme", "active");
        item.industry = Some("retail");
        assert!(FilterState::default().category("retail").matches(&item));
        assert!(!FilterState::default().category("Retail").matches(&item));

        item.industry = None;
        assert!(!FilterState::default().category("retail").matches(&item));
    }

    #[test]
    fn custom_search_fields_override_defaults() {
        let item = Company {
            name: "Acme",
            note: "hidden",
            industry: None,
            status: "active",
        };
        let filter = FilterState::new("hidden");
        let predicate = build_predicate_with(&filter, |c: &Company| vec![c.name.to_string()]);
        assert!(!predicate(&item));
        assert!(filter.matches(&item));
    }

    #[test]
    fn filtering_twice_yields_identical_results() {
        let items = vec![
            company("TechCorp", "active"),
            company("Beta", "active"),
            company("Tech Two", "inactive"),
        ];
        let filter = FilterState::new("tech");

        let first: Vec<&str> = apply_filter(&items, &filter).iter().map(|c| c.name).collect();
        let second: Vec<&str> = apply_filter(&items, &filter).iter().map(|c| c.name).collect();

        assert_eq!(first, vec!["TechCorp", "Tech Two"]);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_filter_input_reads_as_empty() {
        let filter: FilterState =
            serde_json::from_str(r#"{"query": null, "category": 7, "status": ["active"]}"#)
                .unwrap();
        assert_eq!(filter, FilterState::default());

        let filter: FilterState = serde_json::from_str(r#"{"query": 42}"#).unwrap();
        assert_eq!(filter.query, "");

        let filter: FilterState =
            serde_json::from_str(r#"{"query": "tech", "status": "active"}"#).unwrap();
        assert_eq!(filter, FilterState::new("tech").status("active"));
    }
}
