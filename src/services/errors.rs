use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request was rejected before touching storage.
    #[error("{0}")]
    Validation(String),
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The store could not be reached or a transaction failed.
    #[error("storage unavailable")]
    StorageUnavailable,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
