use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::filter::Filterable;
use crate::domain::sort::{SortKey, Sortable};
use crate::domain::types::DisplayName;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    fn rank(self) -> i64 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
        }
    }
}

/// Follow-up task assigned to a manager.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub public_id: Uuid,
    pub title: DisplayName,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Filterable for Task {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.assignee.as_deref());
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.priority.as_str())
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Sortable for Task {
    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "title" => Some(SortKey::text(&self.title)),
            // Ranked rather than alphabetical so that `high` sorts above `low`.
            "priority" => Some(SortKey::Number(self.priority.rank())),
            "due_date" => self.due_date.map(SortKey::Date),
            "created_at" => Some(SortKey::Date(self.created_at)),
            _ => None,
        }
    }
}
