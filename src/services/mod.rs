use thiserror::Error;

use crate::forms::FormError;
use crate::pagination::PaginationError;
use crate::repository::errors::RepositoryError;

pub mod listing;

/// Errors surfaced to the views consuming the list services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
