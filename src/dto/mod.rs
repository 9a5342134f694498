//! Data transfer objects exchanged between services and views.

pub mod list;
