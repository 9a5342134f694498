use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::filter::Filterable;
use crate::domain::sort::{SortKey, Sortable};
use crate::domain::types::{Email, ReferralLogId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReferralStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Approved => "approved",
            ReferralStatus::Rejected => "rejected",
        }
    }
}

/// Sign-up attributed to an affiliate's referral code.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReferralLog {
    pub id: ReferralLogId,
    pub referral_code: String,
    pub referred_email: Email,
    pub campaign: Option<String>,
    pub status: ReferralStatus,
    pub reward_points: i64,
    pub created_at: NaiveDateTime,
}

impl Filterable for ReferralLog {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.referred_email.as_str(), self.referral_code.as_str()]
    }

    fn category(&self) -> Option<&str> {
        self.campaign.as_deref()
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Sortable for ReferralLog {
    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "id" => Some(SortKey::Number(i64::from(self.id.get()))),
            "referred_email" => Some(SortKey::text(self.referred_email.as_str())),
            "reward_points" => Some(SortKey::Number(self.reward_points)),
            "created_at" => Some(SortKey::Date(self.created_at)),
            _ => None,
        }
    }
}
