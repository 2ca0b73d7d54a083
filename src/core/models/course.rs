//! Course model

use super::{lenient_string, Activity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a course
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseResult {
    /// No graded activity yet
    #[default]
    Pending,
    /// Final grade at or above the passing grade
    Approved,
    /// Final grade below the passing grade
    Failed,
    /// Manually withdrawn; overrides the grade
    Withdrawn,
}

impl CourseResult {
    /// Lowercase name as stored on disk
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Failed => "failed",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for CourseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "failed" => Ok(Self::Failed),
            "withdrawn" => Ok(Self::Withdrawn),
            _ => Err(format!("Unknown course result: '{s}'")),
        }
    }
}

/// One academic subject taken in one term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Identifier assigned at creation
    pub id: String,

    /// Course code (e.g., "MAT115")
    pub code: String,

    /// Course name (e.g., "Matemática I")
    pub name: String,

    /// Attempt number, "1" through "4"
    #[serde(default, deserialize_with = "lenient_string")]
    pub enrollment: String,

    /// Credit units (UV)
    pub uvs: u32,

    /// Term this course belongs to; empty when detached
    #[serde(default, deserialize_with = "lenient_string")]
    pub semester_id: String,

    /// Graded activities, in insertion order
    #[serde(default)]
    pub activities: Vec<Activity>,

    /// Derived final grade, one decimal
    #[serde(default)]
    pub final_grade: f64,

    /// Derived (or manually withdrawn) outcome
    #[serde(default)]
    pub result: CourseResult,
}

impl Course {
    /// Build a course from a draft. Activities start empty, the grade at zero,
    /// and the result at `pending` unless the draft is withdrawn.
    #[must_use]
    pub fn from_draft(id: String, draft: NewCourse) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            enrollment: draft.enrollment,
            uvs: draft.uvs,
            semester_id: draft.semester_id,
            activities: Vec::new(),
            final_grade: 0.0,
            result: if draft.withdrawn {
                CourseResult::Withdrawn
            } else {
                CourseResult::Pending
            },
        }
    }

    /// Whether the withdrawn status is set
    #[must_use]
    pub fn is_withdrawn(&self) -> bool {
        self.result == CourseResult::Withdrawn
    }

    /// Whether the course is attached to a term
    #[must_use]
    pub fn has_term(&self) -> bool {
        !self.semester_id.is_empty()
    }

    /// Sum of the activity percentages
    #[must_use]
    pub fn percentage_total(&self) -> f64 {
        self.activities.iter().map(|a| a.percentage).sum()
    }

    /// Look up an activity by id
    #[must_use]
    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == activity_id)
    }

    /// Merge the set fields of `patch`. Derived fields are only changed when the
    /// patch carries them explicitly.
    pub fn apply(&mut self, patch: CoursePatch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(enrollment) = patch.enrollment {
            self.enrollment = enrollment;
        }
        if let Some(uvs) = patch.uvs {
            self.uvs = uvs;
        }
        if let Some(semester_id) = patch.semester_id {
            self.semester_id = semester_id;
        }
        if let Some(final_grade) = patch.final_grade {
            self.final_grade = final_grade;
        }
        if let Some(result) = patch.result {
            self.result = result;
        }
    }
}

/// Fields supplied by the caller when adding a course
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewCourse {
    /// Course code
    pub code: String,
    /// Course name
    pub name: String,
    /// Attempt number
    pub enrollment: String,
    /// Credit units
    pub uvs: u32,
    /// Owning term id (may be empty)
    pub semester_id: String,
    /// Create the course already withdrawn
    pub withdrawn: bool,
}

/// Shallow course update; `None` leaves the field untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoursePatch {
    /// New code
    pub code: Option<String>,
    /// New name
    pub name: Option<String>,
    /// New attempt number
    pub enrollment: Option<String>,
    /// New credit units
    pub uvs: Option<u32>,
    /// New term id (empty string detaches)
    pub semester_id: Option<String>,
    /// Caller-computed final grade
    pub final_grade: Option<f64>,
    /// Caller-computed result
    pub result: Option<CourseResult>,
}
