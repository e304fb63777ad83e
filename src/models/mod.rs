pub mod comparison;
#[cfg(feature = "cli")]
pub mod config;
pub mod product;
pub mod schedule;
