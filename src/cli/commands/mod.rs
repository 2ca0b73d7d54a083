//! CLI command handlers for `cumtracker`.
//!
//! Each command is implemented in its own submodule. Record commands receive an
//! opened [`AcademicStore`]; handlers return a user-facing message on failure and
//! `main` decides the exit code.

pub mod activity;
pub mod config;
pub mod course;
pub mod data;
pub mod report;
pub mod stats;
pub mod term;

use cum_tracker::config::Config;
use cum_tracker::core::persistence::FileStore;
use cum_tracker::core::AcademicStore;
use cum_tracker::info;
use std::io::{self, Write};

/// Open the store backed by the configured record directory
pub fn open_store(config: &Config) -> AcademicStore {
    let dir = config.data_dir();
    info!("Opening records in {}", dir.display());
    AcademicStore::open(FileStore::new(dir))
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}

/// Resolve a course key to its id
pub fn resolve_course(store: &AcademicStore, key: &str) -> Result<String, String> {
    store
        .find_course(key)
        .map(|c| c.id.clone())
        .ok_or_else(|| format!("✗ No single course matches '{key}'"))
}

/// Resolve a term key to its id
pub fn resolve_term(store: &AcademicStore, key: &str) -> Result<String, String> {
    store
        .find_term(key)
        .map(|t| t.id.clone())
        .ok_or_else(|| format!("✗ No single term matches '{key}'"))
}

/// First eight characters of an id, enough to type back
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
