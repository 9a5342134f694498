use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::sort::{SortKey, Sortable};
use crate::domain::types::{ClientId, DisplayName, Email};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Inactive,
    Prospect,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Prospect => "prospect",
        }
    }
}

/// Customer row of the clients table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: DisplayName,
    pub email: Option<Email>,
    pub phone: Option<String>,
    /// Industry tab the client is grouped under.
    pub industry: Option<String>,
    pub status: ClientStatus,
    pub created_at: NaiveDateTime,
}

impl Client {
    #[must_use]
    pub fn new(
        id: ClientId,
        name: DisplayName,
        email: Option<Email>,
        phone: Option<String>,
        industry: Option<String>,
        status: ClientStatus,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            industry: industry
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
            created_at,
        }
    }
}

impl Filterable for Client {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.email.as_ref().map(Email::as_str));
        fields.extend(self.phone.as_deref());
        fields
    }

    fn category(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Sortable for Client {
    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "id" => Some(SortKey::Number(i64::from(self.id.get()))),
            "name" => Some(SortKey::text(&self.name)),
            "email" => self.email.as_ref().map(|e| SortKey::text(e.as_str())),
            "status" => Some(SortKey::text(self.status.as_str())),
            "created_at" => Some(SortKey::Date(self.created_at)),
            _ => None,
        }
    }
}
