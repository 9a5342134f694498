use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::sort::{SortKey, Sortable};
use crate::domain::types::{DisplayName, Email, LeadId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Lost => "lost",
        }
    }
}

/// Prospect captured from a marketing channel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: LeadId,
    pub name: DisplayName,
    pub company: Option<String>,
    pub email: Option<Email>,
    /// Acquisition channel, e.g. `website` or `referral`.
    pub source: String,
    pub status: LeadStatus,
    /// Estimated deal value in minor currency units.
    pub value: i64,
    pub created_at: NaiveDateTime,
}

impl Filterable for Lead {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.company.as_deref());
        fields.extend(self.email.as_ref().map(Email::as_str));
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.source.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Sortable for Lead {
    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "id" => Some(SortKey::Number(i64::from(self.id.get()))),
            "name" => Some(SortKey::text(&self.name)),
            "company" => self.company.as_deref().map(SortKey::text),
            "value" => Some(SortKey::Number(self.value)),
            "created_at" => Some(SortKey::Date(self.created_at)),
            _ => None,
        }
    }
}
