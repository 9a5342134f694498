use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => RepositoryError::DataSource(format!("I/O error: {err}")),
            csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. } => {
                RepositoryError::ValidationError(format!("Malformed row: {err}"))
            }
            csv::ErrorKind::Utf8 { .. } => {
                RepositoryError::ValidationError(format!("Invalid UTF-8: {err}"))
            }
            _ => RepositoryError::Unexpected(format!("Unexpected csv error: {err}")),
        }
    }
}
