//! Library for `cum-tracker`
//! Academic record model, grade/CUM derivation, and the persistent academic store
//! used by the `cumtracker` command-line interface.

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
