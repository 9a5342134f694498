//! Listed entities and the filter/sort rules applied to them.

pub mod client;
pub mod filter;
pub mod lead;
pub mod referral_log;
pub mod sort;
pub mod task;
pub mod types;
