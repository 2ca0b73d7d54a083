//! Core module: academic records, derivation rules, persistence and the store

pub mod config;
pub mod cum;
pub mod error;
pub mod grades;
pub mod models;
pub mod persistence;
pub mod report;
pub mod scholarship;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{ExportError, ImportError, StorageError, ValidationError};
pub use store::AcademicStore;

/// Returns the current version of the `cum-tracker` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
