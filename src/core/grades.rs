//! Grade arithmetic: final grade of a course and its outcome

use crate::core::models::{Activity, Course, CourseResult};

/// Minimum final grade that passes a course
pub const PASSING_GRADE: f64 = 6.0;

/// Highest attainable grade
pub const MAX_GRADE: f64 = 10.0;

/// Absorbs binary representation error so that values printed as an exact tie
/// (e.g. 7.65) round away from zero.
const TIE_SLACK: f64 = 1e-9;

/// Round to one decimal place, ties away from zero.
///
/// Non-finite input yields `0.0`.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let scaled = value * 10.0;
    (scaled + TIE_SLACK.copysign(scaled)).round() / 10.0
}

/// Weighted sum `Σ grade × percentage / 100`, rounded to one decimal.
///
/// An empty slice yields `0.0`. Out-of-range values are not rejected here.
#[must_use]
pub fn compute_final_grade(activities: &[Activity]) -> f64 {
    if activities.is_empty() {
        return 0.0;
    }
    let points: f64 = activities.iter().map(|a| a.grade * a.percentage).sum();
    round_one_decimal(points / 100.0)
}

/// Classify a grade: `withdrawn` when the flag is set, otherwise `approved` at or
/// above [`PASSING_GRADE`] and `failed` below it.
#[must_use]
pub fn classify(final_grade: f64, withdrawn: bool) -> CourseResult {
    if withdrawn {
        CourseResult::Withdrawn
    } else if final_grade >= PASSING_GRADE {
        CourseResult::Approved
    } else {
        CourseResult::Failed
    }
}

/// Result of a course from its stored final grade and withdrawn status
#[must_use]
pub fn compute_result(course: &Course) -> CourseResult {
    classify(course.final_grade, course.is_withdrawn())
}

/// Result derived from a course's activities.
///
/// A course with no activities stays `pending` instead of being classified as
/// `failed` on its default grade of zero.
#[must_use]
pub fn derive_result(activities: &[Activity], final_grade: f64, withdrawn: bool) -> CourseResult {
    if withdrawn {
        CourseResult::Withdrawn
    } else if activities.is_empty() {
        CourseResult::Pending
    } else {
        classify(final_grade, false)
    }
}

/// Recompute `final_grade` and `result` from the course's current activities,
/// keeping the withdrawn status.
pub fn refresh_derived(course: &mut Course) {
    let withdrawn = course.is_withdrawn();
    course.final_grade = compute_final_grade(&course.activities);
    course.result = derive_result(&course.activities, course.final_grade, withdrawn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{NewActivity, NewCourse};

    fn activity(percentage: f64, grade: f64) -> Activity {
        Activity::from_draft(
            format!("{percentage}-{grade}"),
            NewActivity::new("act", percentage, grade),
        )
    }

    fn course_with(activities: Vec<Activity>) -> Course {
        let mut course = Course::from_draft(
            "c1".to_string(),
            NewCourse {
                code: "MAT115".to_string(),
                name: "Matemática I".to_string(),
                enrollment: "1".to_string(),
                uvs: 4,
                ..NewCourse::default()
            },
        );
        course.activities = activities;
        course
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_activities_yield_zero() {
        assert_close(compute_final_grade(&[]), 0.0);
    }

    #[test]
    fn single_full_weight_activity() {
        assert_close(compute_final_grade(&[activity(100.0, 10.0)]), 10.0);
    }

    #[test]
    fn two_halves_average() {
        let grade = compute_final_grade(&[activity(50.0, 8.0), activity(50.0, 6.0)]);
        assert_close(grade, 7.0);
    }

    #[test]
    fn ties_round_up() {
        // 8.5 * 0.5 + 6.8 * 0.5 = 7.65
        let grade = compute_final_grade(&[activity(50.0, 8.5), activity(50.0, 6.8)]);
        assert_close(grade, 7.7);
        assert_close(round_one_decimal(1.65), 1.7);
        assert_close(round_one_decimal(7.65), 7.7);
        assert_close(round_one_decimal(7.64), 7.6);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = vec![activity(20.0, 7.3), activity(30.0, 9.1), activity(50.0, 4.4)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_close(compute_final_grade(&forward), compute_final_grade(&backward));
    }

    #[test]
    fn partial_weights_are_not_normalized() {
        // Only 40% of the course graded so far
        assert_close(compute_final_grade(&[activity(40.0, 10.0)]), 4.0);
    }

    #[test]
    fn non_finite_rounds_to_zero() {
        assert_close(round_one_decimal(f64::NAN), 0.0);
        assert_close(round_one_decimal(f64::INFINITY), 0.0);
    }

    #[test]
    fn withdrawn_overrides_grade() {
        let mut course = course_with(vec![activity(100.0, 9.0)]);
        course.final_grade = 9.0;
        course.result = CourseResult::Withdrawn;
        assert_eq!(compute_result(&course), CourseResult::Withdrawn);
    }

    #[test]
    fn classification_threshold() {
        assert_eq!(classify(6.0, false), CourseResult::Approved);
        assert_eq!(classify(5.9, false), CourseResult::Failed);
        assert_eq!(classify(10.0, false), CourseResult::Approved);
        assert_eq!(classify(0.0, true), CourseResult::Withdrawn);
    }

    #[test]
    fn refresh_keeps_pending_without_activities() {
        let mut course = course_with(Vec::new());
        refresh_derived(&mut course);
        assert_eq!(course.result, CourseResult::Pending);
        assert_close(course.final_grade, 0.0);
    }

    #[test]
    fn refresh_derives_from_activities() {
        let mut course = course_with(vec![activity(50.0, 7.0), activity(50.0, 9.0)]);
        refresh_derived(&mut course);
        assert_close(course.final_grade, 8.0);
        assert_eq!(course.result, CourseResult::Approved);

        course.activities = vec![activity(100.0, 3.0)];
        refresh_derived(&mut course);
        assert_eq!(course.result, CourseResult::Failed);
    }

    #[test]
    fn refresh_keeps_withdrawn_but_updates_grade() {
        let mut course = course_with(vec![activity(100.0, 9.0)]);
        course.result = CourseResult::Withdrawn;
        refresh_derived(&mut course);
        assert_eq!(course.result, CourseResult::Withdrawn);
        assert_close(course.final_grade, 9.0);
    }
}
