//! Activity model

use serde::{Deserialize, Serialize};

/// A graded component of a course (exam, lab, homework...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Identifier assigned at creation
    pub id: String,

    /// Short label (e.g., "Parcial 1")
    pub name: String,

    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Weight in the course's final grade, `0 < percentage <= 100`
    pub percentage: f64,

    /// Score, `0 <= grade <= 10`
    pub grade: f64,
}

impl Activity {
    /// Build an activity from a draft with the given identifier
    #[must_use]
    pub fn from_draft(id: String, draft: NewActivity) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            percentage: draft.percentage,
            grade: draft.grade,
        }
    }

    /// Contribution of this activity to the final grade, before rounding
    #[must_use]
    pub fn weighted_grade(&self) -> f64 {
        self.grade * self.percentage / 100.0
    }

    /// Merge the set fields of `patch` into this activity
    pub fn apply(&mut self, patch: ActivityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(percentage) = patch.percentage {
            self.percentage = percentage;
        }
        if let Some(grade) = patch.grade {
            self.grade = grade;
        }
    }
}

/// Fields supplied by the caller when adding an activity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewActivity {
    /// Short label
    pub name: String,
    /// Optional free text
    pub description: Option<String>,
    /// Weight in percent
    pub percentage: f64,
    /// Score out of 10
    pub grade: f64,
}

impl NewActivity {
    /// Convenience constructor without description
    #[must_use]
    pub fn new(name: impl Into<String>, percentage: f64, grade: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            percentage,
            grade,
        }
    }
}

/// Partial update of an activity; `None` leaves the field untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityPatch {
    /// New label
    pub name: Option<String>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New weight
    pub percentage: Option<f64>,
    /// New score
    pub grade: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_grade_scales_by_percentage() {
        let activity = Activity::from_draft("a1".to_string(), NewActivity::new("Parcial", 40.0, 8.0));
        assert!((activity.weighted_grade() - 3.2).abs() < 1e-12);
    }

    #[test]
    fn apply_only_touches_set_fields() {
        let mut activity = Activity::from_draft(
            "a1".to_string(),
            NewActivity {
                name: "Lab".to_string(),
                description: Some("Week 3".to_string()),
                percentage: 20.0,
                grade: 7.0,
            },
        );

        activity.apply(ActivityPatch {
            grade: Some(9.5),
            ..ActivityPatch::default()
        });
        assert_eq!(activity.name, "Lab");
        assert_eq!(activity.description.as_deref(), Some("Week 3"));
        assert!((activity.grade - 9.5).abs() < f64::EPSILON);

        activity.apply(ActivityPatch {
            description: Some(None),
            ..ActivityPatch::default()
        });
        assert!(activity.description.is_none());
    }

    #[test]
    fn description_is_omitted_when_absent() {
        let activity = Activity::from_draft("a1".to_string(), NewActivity::new("Quiz", 10.0, 6.0));
        let json = serde_json::to_string(&activity).expect("serialize activity");
        assert!(!json.contains("description"));
    }
}
