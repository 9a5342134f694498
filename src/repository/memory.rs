//! Client-side data source over a fully loaded collection.

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::domain::filter::{Filterable, apply_filter};
use crate::domain::sort::{Sortable, sort_refs};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ListQuery, ListSource};

/// Filters, sorts and pages an owned collection.
///
/// Used for lists the dashboard ships as static data; the reported total is
/// the size of the filtered collection.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource<T> {
    items: Vec<T>,
}

impl<T> InMemorySource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }
}

impl<T: DeserializeOwned> InMemorySource<T> {
    /// Loads rows from CSV with a header line naming the entity fields.
    pub fn from_csv_reader<R: Read>(reader: R) -> RepositoryResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let items = rdr
            .deserialize()
            .collect::<Result<Vec<T>, csv::Error>>()
            .map_err(|err| {
                log::error!("Failed to parse seed rows: {err}");
                err
            })?;
        Ok(Self::new(items))
    }
}

impl<T> ListSource<T> for InMemorySource<T>
where
    T: Filterable + Sortable + Clone,
{
    fn list(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<T>)> {
        let mut matched = apply_filter(&self.items, &query.filter());
        if let Some(sort) = &query.sort {
            sort_refs(&mut matched, sort);
        }

        let total = matched.len();
        let page = match query.pagination {
            Some(pagination) if pagination.per_page > 0 => {
                let page = pagination.page.max(1);
                matched
                    .into_iter()
                    .skip((page - 1).saturating_mul(pagination.per_page))
                    .take(pagination.per_page)
                    .cloned()
                    .collect()
            }
            _ => matched.into_iter().cloned().collect(),
        };

        Ok((total, page))
    }
}
