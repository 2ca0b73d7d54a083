//! Input validation shared by the store and the command-line forms

use crate::core::error::ValidationError;
use crate::core::grades::MAX_GRADE;
use crate::core::models::{Activity, Course, NewCourse, NewTerm, Term};
use std::collections::HashSet;

/// Tolerance for percentage sums such as 33.3 + 33.3 + 33.4
const PERCENT_SLACK: f64 = 1e-9;

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Check a single percentage: finite and in `(0, 100]`
///
/// # Errors
/// Returns the violated rule
pub fn check_percentage(percentage: f64) -> Result<(), ValidationError> {
    if !percentage.is_finite() {
        return Err(ValidationError::NotFinite { field: "percentage" });
    }
    if percentage <= 0.0 || percentage > 100.0 {
        return Err(ValidationError::PercentageOutOfRange(percentage));
    }
    Ok(())
}

/// Check a single grade: finite and in `[0, 10]`
///
/// # Errors
/// Returns the violated rule
pub fn check_grade(grade: f64) -> Result<(), ValidationError> {
    if !grade.is_finite() {
        return Err(ValidationError::NotFinite { field: "grade" });
    }
    if !(0.0..=MAX_GRADE).contains(&grade) {
        return Err(ValidationError::GradeOutOfRange(grade));
    }
    Ok(())
}

/// Check the fields of an activity
///
/// # Errors
/// Returns the first violated rule
pub fn check_activity_fields(name: &str, percentage: f64, grade: f64) -> Result<(), ValidationError> {
    require(name, "activity name")?;
    check_percentage(percentage)?;
    check_grade(grade)
}

/// Check that a set of percentages does not exceed 100 in total
///
/// # Errors
/// Returns [`ValidationError::PercentageOverflow`] with the offending total
pub fn check_percentage_total<I>(percentages: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = f64>,
{
    let total: f64 = percentages.into_iter().sum();
    if total > 100.0 + PERCENT_SLACK {
        Err(ValidationError::PercentageOverflow { total })
    } else {
        Ok(())
    }
}

/// Check that `activities` would be a valid activity list for one course
///
/// # Errors
/// Returns the first violated rule
pub fn check_activities(activities: &[Activity]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for activity in activities {
        require(&activity.id, "activity id")?;
        if !seen.insert(activity.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                kind: "activity",
                id: activity.id.clone(),
            });
        }
        check_activity_fields(&activity.name, activity.percentage, activity.grade)?;
    }
    check_percentage_total(activities.iter().map(|a| a.percentage))
}

/// Check the attempt number: "1" through "4"
///
/// # Errors
/// Returns [`ValidationError::InvalidEnrollment`]
pub fn check_enrollment(enrollment: &str) -> Result<(), ValidationError> {
    match enrollment.trim() {
        "1" | "2" | "3" | "4" => Ok(()),
        other => Err(ValidationError::InvalidEnrollment(other.to_string())),
    }
}

/// Check a course draft the way the course form does
///
/// # Errors
/// Returns the first violated rule
pub fn check_new_course(draft: &NewCourse) -> Result<(), ValidationError> {
    require(&draft.code, "course code")?;
    require(&draft.name, "course name")?;
    check_enrollment(&draft.enrollment)?;
    if draft.uvs == 0 {
        return Err(ValidationError::NonPositiveUvs);
    }
    Ok(())
}

/// Check a term draft: a name and a numeric year
///
/// # Errors
/// Returns the first violated rule
pub fn check_new_term(draft: &NewTerm) -> Result<(), ValidationError> {
    require(&draft.name, "term name")?;
    check_year(&draft.year)
}

/// Check that a year is a plain non-negative number
///
/// # Errors
/// Returns [`ValidationError::InvalidYear`]
pub fn check_year(year: &str) -> Result<(), ValidationError> {
    if year.trim().parse::<u32>().is_err() {
        return Err(ValidationError::InvalidYear(year.to_string()));
    }
    Ok(())
}

/// Check complete collections before a bulk replacement: unique ids, positive
/// UVs, valid activities. Attempt numbers and years are not re-checked so that
/// older exports still load.
///
/// # Errors
/// Returns the first violated rule, wrapped with the course code when it
/// concerns a course's activities
pub fn check_collections(courses: &[Course], terms: &[Term]) -> Result<(), ValidationError> {
    let mut term_ids = HashSet::new();
    for term in terms {
        require(&term.id, "term id")?;
        if !term_ids.insert(term.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                kind: "term",
                id: term.id.clone(),
            });
        }
    }

    let mut course_ids = HashSet::new();
    for course in courses {
        require(&course.id, "course id")?;
        if !course_ids.insert(course.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                kind: "course",
                id: course.id.clone(),
            });
        }
        let in_course = |source: ValidationError| ValidationError::InCourse {
            course: course.code.clone(),
            source: Box::new(source),
        };
        if course.uvs == 0 {
            return Err(in_course(ValidationError::NonPositiveUvs));
        }
        if !course.final_grade.is_finite() {
            return Err(in_course(ValidationError::NotFinite {
                field: "finalGrade",
            }));
        }
        check_activities(&course.activities).map_err(in_course)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::NewActivity;

    fn activity(id: &str, percentage: f64, grade: f64) -> Activity {
        Activity::from_draft(id.to_string(), NewActivity::new("act", percentage, grade))
    }

    #[test]
    fn percentage_bounds() {
        assert!(check_percentage(0.5).is_ok());
        assert!(check_percentage(100.0).is_ok());
        assert_eq!(
            check_percentage(0.0),
            Err(ValidationError::PercentageOutOfRange(0.0))
        );
        assert!(check_percentage(100.5).is_err());
        assert!(matches!(
            check_percentage(f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn grade_bounds() {
        assert!(check_grade(0.0).is_ok());
        assert!(check_grade(10.0).is_ok());
        assert!(check_grade(-0.1).is_err());
        assert!(check_grade(10.1).is_err());
    }

    #[test]
    fn activity_name_is_required() {
        assert_eq!(
            check_activity_fields("  ", 10.0, 5.0),
            Err(ValidationError::MissingField("activity name"))
        );
    }

    #[test]
    fn percentage_total_allows_float_noise() {
        assert!(check_percentage_total([33.3, 33.3, 33.4]).is_ok());
        assert!(matches!(
            check_percentage_total([60.0, 50.0]),
            Err(ValidationError::PercentageOverflow { .. })
        ));
    }

    #[test]
    fn duplicate_activity_ids_are_rejected() {
        let activities = [activity("a", 10.0, 5.0), activity("a", 20.0, 5.0)];
        assert!(matches!(
            check_activities(&activities),
            Err(ValidationError::DuplicateId { kind: "activity", .. })
        ));
    }

    #[test]
    fn course_draft_rules() {
        let good = NewCourse {
            code: "MAT115".to_string(),
            name: "Matemática I".to_string(),
            enrollment: "1".to_string(),
            uvs: 4,
            semester_id: String::new(),
            withdrawn: false,
        };
        assert!(check_new_course(&good).is_ok());
        assert_eq!(
            check_new_course(&NewCourse {
                uvs: 0,
                ..good.clone()
            }),
            Err(ValidationError::NonPositiveUvs)
        );
        assert!(matches!(
            check_new_course(&NewCourse {
                enrollment: "5".to_string(),
                ..good
            }),
            Err(ValidationError::InvalidEnrollment(_))
        ));
    }

    #[test]
    fn term_year_must_be_numeric() {
        assert!(check_new_term(&NewTerm::new("Ciclo 1", "2025")).is_ok());
        assert!(check_new_term(&NewTerm::new("Ciclo 1", "dos mil")).is_err());
        assert!(check_new_term(&NewTerm::new("", "2025")).is_err());
    }

    #[test]
    fn collections_reject_duplicate_terms() {
        let t = Term::from_draft("t1".to_string(), NewTerm::new("Ciclo 1", "2025"));
        assert!(matches!(
            check_collections(&[], &[t.clone(), t]),
            Err(ValidationError::DuplicateId { kind: "term", .. })
        ));
    }
}
