//! Data models for `cum-tracker`

pub mod activity;
pub mod course;
pub mod term;

pub use activity::{Activity, ActivityPatch, NewActivity};
pub use course::{Course, CoursePatch, CourseResult, NewCourse};
pub use term::{DeletePolicy, NewTerm, Term, TermPatch};

use serde::{Deserialize, Deserializer};

/// Accept a JSON string, number, or null where a text field is expected.
///
/// Older exports wrote attempt numbers and years as either strings or numbers,
/// and detached courses sometimes carry `null` instead of an empty term id.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Fresh opaque identifier for a new record
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
