use thiserror::Error;

use crate::db::DbError;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The database could not be reached, or a query or transaction failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// A stored row could not be converted into a domain value.
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<diesel::result::Error> for RepositoryError {
    fn from(val: diesel::result::Error) -> Self {
        RepositoryError::StorageUnavailable(val.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(val: diesel::r2d2::PoolError) -> Self {
        RepositoryError::StorageUnavailable(val.to_string())
    }
}

impl From<DbError> for RepositoryError {
    fn from(val: DbError) -> Self {
        RepositoryError::StorageUnavailable(val.to_string())
    }
}
