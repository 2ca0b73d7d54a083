//! Import/export snapshot file
//!
//! ```json
//! { "courses": [...], "semesters": [...], "version": "1.0", "exportDate": "2025-06-01T12:00:00Z" }
//! ```
//!
//! An import must carry both `courses` and `semesters` as arrays (possibly empty).
//! `version` and `exportDate` are informational.

use crate::core::error::{ExportError, ImportError};
use crate::core::models::{Course, Term};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Format version written into exports
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Export document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Every course, with activities
    pub courses: Vec<Course>,
    /// Every term
    pub semesters: Vec<Term>,
    /// Format version
    pub version: String,
    /// When the export was taken
    pub export_date: DateTime<Utc>,
}

impl Snapshot {
    /// Snapshot of the given collections taken now
    #[must_use]
    pub fn new(courses: Vec<Course>, semesters: Vec<Term>) -> Self {
        Self {
            courses,
            semesters,
            version: SNAPSHOT_VERSION.to_string(),
            export_date: Utc::now(),
        }
    }

    /// Pretty-printed JSON text
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Collections read from an import file, not yet applied
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedData {
    /// Imported courses
    pub courses: Vec<Course>,
    /// Imported terms
    pub terms: Vec<Term>,
    /// Declared format version, if any
    pub version: Option<String>,
    /// Declared export timestamp, if any
    pub export_date: Option<String>,
}

fn take_array(root: &mut serde_json::Map<String, Value>, key: &str) -> Option<Value> {
    match root.remove(key) {
        Some(value @ Value::Array(_)) => Some(value),
        _ => None,
    }
}

/// Parse snapshot text. Nothing is applied here.
///
/// # Errors
/// Returns [`ImportError`] for invalid JSON, a missing or non-array `courses` or
/// `semesters` entry, or records that do not match the course/term shape
pub fn parse_snapshot(text: &str) -> Result<ImportedData, ImportError> {
    let Value::Object(mut root) = serde_json::from_str::<Value>(text)? else {
        return Err(ImportError::Malformed("expected a JSON object"));
    };

    let courses = take_array(&mut root, "courses")
        .ok_or(ImportError::Malformed("'courses' must be an array"))?;
    let semesters = take_array(&mut root, "semesters")
        .ok_or(ImportError::Malformed("'semesters' must be an array"))?;

    let courses: Vec<Course> = serde_json::from_value(courses)
        .map_err(|source| ImportError::Record { kind: "course", source })?;
    let terms: Vec<Term> = serde_json::from_value(semesters)
        .map_err(|source| ImportError::Record { kind: "semester", source })?;

    let text_field = |key: &str| root.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(ImportedData {
        courses,
        terms,
        version: text_field("version"),
        export_date: text_field("exportDate"),
    })
}

/// Read and parse a snapshot file
///
/// # Errors
/// Returns [`ImportError`] if the file cannot be read or parsed
pub fn read_snapshot_file(path: &Path) -> Result<ImportedData, ImportError> {
    let text = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&text)
}

/// Write a snapshot as pretty JSON, creating parent directories
///
/// # Errors
/// Returns [`ExportError`] if serialization or writing fails
pub fn write_snapshot_file(path: &Path, snapshot: &Snapshot) -> Result<(), ExportError> {
    let json = snapshot.to_json()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Default export file name for a given day, e.g. `cumtracker_data_2025-06-01.json`
#[must_use]
pub fn export_file_name(day: NaiveDate) -> String {
    format!("cumtracker_data_{}.json", day.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_empty_collections() {
        let data = parse_snapshot(r#"{"courses":[],"semesters":[]}"#).expect("parse");
        assert!(data.courses.is_empty());
        assert!(data.terms.is_empty());
        assert!(data.version.is_none());
    }

    #[test]
    fn reads_original_app_export() {
        let text = r#"{
            "courses": [{
                "id": "1714000000001",
                "code": "MAT115",
                "name": "Matemática I",
                "enrollment": "1",
                "uvs": 4,
                "semesterId": "1714000000000",
                "finalGrade": 8,
                "result": "approved",
                "activities": [
                    {"id": "a1", "name": "Parcial1", "description": "", "percentage": 50, "grade": 7},
                    {"id": "a2", "name": "Parcial2", "percentage": 50, "grade": 9}
                ]
            }],
            "semesters": [{"id": "1714000000000", "name": "Ciclo 1", "year": "2025"}],
            "version": "1.0",
            "exportDate": "2025-06-01T12:00:00.000Z"
        }"#;
        let data = parse_snapshot(text).expect("parse");
        assert_eq!(data.courses.len(), 1);
        assert_eq!(data.courses[0].activities.len(), 2);
        assert_eq!(data.terms[0].year, "2025");
        assert_eq!(data.version.as_deref(), Some("1.0"));
        assert_eq!(data.export_date.as_deref(), Some("2025-06-01T12:00:00.000Z"));
    }

    #[test]
    fn rejects_missing_collections() {
        assert!(matches!(
            parse_snapshot(r#"{"courses":[]}"#),
            Err(ImportError::Malformed(_))
        ));
        assert!(matches!(
            parse_snapshot(r#"{"courses":{},"semesters":[]}"#),
            Err(ImportError::Malformed(_))
        ));
        assert!(matches!(parse_snapshot("[]"), Err(ImportError::Malformed(_))));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(parse_snapshot("{courses"), Err(ImportError::Json(_))));
    }

    #[test]
    fn rejects_bad_records() {
        let text = r#"{"courses":[{"id":"c1"}],"semesters":[]}"#;
        assert!(matches!(
            parse_snapshot(text),
            Err(ImportError::Record { kind: "course", .. })
        ));
    }

    #[test]
    fn export_carries_version_and_date() {
        let json = Snapshot::new(Vec::new(), Vec::new()).to_json().expect("serialize");
        assert!(json.contains("\"version\": \"1.0\""));
        assert!(json.contains("\"exportDate\""));
        let back = parse_snapshot(&json).expect("parse own export");
        assert_eq!(back.version.as_deref(), Some(SNAPSHOT_VERSION));
    }

    #[test]
    fn file_name_uses_iso_day() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        assert_eq!(export_file_name(day), "cumtracker_data_2025-06-01.json");
    }
}
