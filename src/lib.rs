//! Core library exports for Shelf Watch.
//!
//! The `data` feature exposes the persistence and diff layers (`domain`,
//! `diff`, `models`, `repository`, `schema`). The `cli` feature adds product
//! acquisition, forms and the service layer used by the command line tool.

#[cfg(feature = "cli")]
pub mod acquisition;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod diff;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
mod error_conversions;
#[cfg(feature = "cli")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "cli")]
pub mod services;
