//! Filtering, sorting and windowed pagination for the CRM dashboard list
//! views (clients, leads, tasks, referral logs).
//!
//! A [`services::listing::ListView`] owns the state of one table and pulls
//! rows from any [`repository::ListSource`]: an in-memory collection filtered
//! on the client, or a paginated backend endpoint reporting its own totals.

pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;
