//! Domain entities and value objects, independent of persistence.

pub mod comparison;
pub mod product;
pub mod schedule;
pub mod types;
