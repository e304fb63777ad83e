pub mod compare;
pub mod errors;
pub mod job;
pub mod report;
pub mod runs;
pub mod schedule;

pub use errors::{ServiceError, ServiceResult};
