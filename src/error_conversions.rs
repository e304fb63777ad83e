//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here instead of next to either side.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;
#[cfg(feature = "cli")]
use crate::forms::schedule::ScheduleFormError;
#[cfg(feature = "cli")]
use crate::services::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "cli")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

#[cfg(feature = "cli")]
impl From<ScheduleFormError> for ServiceError {
    fn from(val: ScheduleFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

#[cfg(feature = "cli")]
impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::StorageUnavailable(_) => ServiceError::StorageUnavailable,
            RepositoryError::ValidationError(_) => ServiceError::Internal,
        }
    }
}
