//! Form definitions for list view query strings and controls.

use thiserror::Error;
use validator::ValidationErrors;

pub mod list;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed query string: {0}")]
    Malformed(String),

    #[error("invalid page size")]
    InvalidPageSize,
}
