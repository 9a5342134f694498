#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_listing::domain::client::{Client, ClientStatus};
use pushkind_listing::domain::lead::{Lead, LeadStatus};
use pushkind_listing::domain::referral_log::{ReferralLog, ReferralStatus};
use pushkind_listing::domain::types::{ClientId, DisplayName, Email, LeadId, ReferralLogId};

pub fn day(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn client(id: i32, name: &str, status: ClientStatus) -> Client {
    Client::new(
        ClientId::new(id).unwrap(),
        DisplayName::new(name).unwrap(),
        None,
        None,
        None,
        status,
        day(1 + (id as u32 % 28)),
    )
}

/// The three rows used to illustrate search composed with a status tab.
pub fn techcorp_fixture() -> Vec<Client> {
    vec![
        client(1, "TechCorp", ClientStatus::Active),
        client(2, "TechCorp", ClientStatus::Inactive),
        client(3, "Other", ClientStatus::Active),
    ]
}

pub fn lead(id: i32, name: &str, source: &str, status: LeadStatus, value: i64) -> Lead {
    Lead {
        id: LeadId::new(id).unwrap(),
        name: DisplayName::new(name).unwrap(),
        company: None,
        email: None,
        source: source.to_string(),
        status,
        value,
        created_at: day(id as u32),
    }
}

/// 35 referral rows, the default size of the affiliate referral log.
pub fn referral_logs() -> Vec<ReferralLog> {
    (1..=35)
        .map(|id| ReferralLog {
            id: ReferralLogId::new(id).unwrap(),
            referral_code: format!("REF{:03}", id % 4),
            referred_email: Email::new(format!("user{id}@example.com")).unwrap(),
            campaign: Some(if id % 2 == 0 { "spring" } else { "summer" }.to_string()),
            status: match id % 3 {
                0 => ReferralStatus::Approved,
                1 => ReferralStatus::Pending,
                _ => ReferralStatus::Rejected,
            },
            reward_points: i64::from(id % 5) * 100,
            created_at: day(1 + (id as u32 % 28)),
        })
        .collect()
}
