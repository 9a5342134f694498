//! Column sort state and the stable sort applied to listed collections.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Direction of a column sort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Active sort column and direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

impl SortState {
    /// Ascending sort on `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn with_order(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// State after the user clicks the header of `clicked_field`.
    #[must_use]
    pub fn toggle(&self, clicked_field: &str) -> Self {
        toggle_sort(&self.field, self.order, clicked_field)
    }
}

/// Clicking the active column flips its order; any other column starts
/// ascending.
pub fn toggle_sort(
    current_field: &str,
    current_order: SortOrder,
    clicked_field: &str,
) -> SortState {
    if current_field == clicked_field {
        SortState::with_order(clicked_field, current_order.flipped())
    } else {
        SortState::new(clicked_field)
    }
}

/// Comparable value extracted from an entity for a given column.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Date(NaiveDateTime),
    Text(String),
}

impl SortKey {
    /// Text keys compare case-insensitively.
    pub fn text(value: &str) -> Self {
        SortKey::Text(value.to_lowercase())
    }
}

/// Exposes sortable columns of a listed entity.
pub trait Sortable {
    /// Key for `field`, or `None` when the entity has no value for it.
    fn sort_key(&self, field: &str) -> Option<SortKey>;
}

/// Items without a value for the column sort after those with one, in both
/// directions.
fn compare_keys(a: &Option<SortKey>, b: &Option<SortKey>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(b),
            SortOrder::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Column key paired with the direction it is compared in.
struct Ranked(Option<SortKey>, SortOrder);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.0, &other.0, self.1)
    }
}

/// Stable sort: items with equal keys keep their relative order.
pub fn sort_items<T: Sortable>(items: &mut [T], sort: &SortState) {
    items.sort_by_cached_key(|item| Ranked(item.sort_key(&sort.field), sort.order));
}

/// Stable sort of references, used on filtered views of a collection.
pub fn sort_refs<T: Sortable>(items: &mut [&T], sort: &SortState) {
    items.sort_by_cached_key(|item| Ranked(item.sort_key(&sort.field), sort.order));
}
