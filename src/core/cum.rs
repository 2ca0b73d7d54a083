//! Term aggregator: credit-weighted CUM and the enrollable-UV ceiling
//!
//! The CUM (coeficiente de unidades de mérito) is `Σ(uvs × final_grade) / Σ uvs`
//! over passed, non-withdrawn courses. The general CUM applies the same formula
//! once over every qualifying course; it is never an average of per-term CUMs.

use crate::core::grades::{round_one_decimal, PASSING_GRADE};
use crate::core::models::{Course, CourseResult};

/// Enrollable UVs for a student with no qualifying course yet
pub const NEW_STUDENT_UVS: u32 = 20;

/// Enrollable UVs when the CUM is positive but below the passing grade
pub const PROBATION_UVS: u32 = 16;

/// `(minimum CUM, enrollable UVs)`, checked top-down
const UV_TIERS: [(f64, u32); 3] = [(7.5, 32), (7.0, 24), (6.0, 20)];

/// Whether a course contributes merit units (passed and not withdrawn)
#[must_use]
pub fn counts_toward_cum(course: &Course) -> bool {
    course.result != CourseResult::Withdrawn && course.final_grade >= PASSING_GRADE
}

/// Credit-weighted average over the qualifying subset of `courses`,
/// rounded to one decimal; `0.0` when nothing qualifies.
fn credit_weighted<'a, I>(courses: I) -> f64
where
    I: IntoIterator<Item = &'a Course>,
{
    let (total_uvs, merit_units) = courses
        .into_iter()
        .filter(|c| counts_toward_cum(c))
        .fold((0_u64, 0.0_f64), |(uvs, ums), c| {
            (uvs + u64::from(c.uvs), c.final_grade.mul_add(f64::from(c.uvs), ums))
        });

    if total_uvs == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let total_uvs = total_uvs as f64;
    round_one_decimal(merit_units / total_uvs)
}

/// CUM of the courses taken in one term
#[must_use]
pub fn compute_term_cum<'a, I>(courses_in_term: I) -> f64
where
    I: IntoIterator<Item = &'a Course>,
{
    credit_weighted(courses_in_term)
}

/// CUM across every approved course, regardless of term
#[must_use]
pub fn compute_general_cum<'a, I>(approved_courses: I) -> f64
where
    I: IntoIterator<Item = &'a Course>,
{
    credit_weighted(approved_courses)
}

/// UVs the student may enroll next term for a given general CUM.
///
/// | CUM              | UVs |
/// |------------------|-----|
/// | ≥ 7.5            | 32  |
/// | ≥ 7.0            | 24  |
/// | ≥ 6.0            | 20  |
/// | 0 (new student)  | 20  |
/// | otherwise        | 16  |
#[must_use]
pub fn compute_inscribible_uvs(general_cum: f64) -> u32 {
    if let Some(&(_, uvs)) = UV_TIERS.iter().find(|(min, _)| general_cum >= *min) {
        return uvs;
    }
    if general_cum <= 0.0 {
        NEW_STUDENT_UVS
    } else {
        PROBATION_UVS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::NewCourse;

    fn course(uvs: u32, final_grade: f64, result: CourseResult) -> Course {
        let mut c = Course::from_draft(
            format!("{uvs}-{final_grade}"),
            NewCourse {
                code: "X".to_string(),
                name: "X".to_string(),
                enrollment: "1".to_string(),
                uvs,
                ..NewCourse::default()
            },
        );
        c.final_grade = final_grade;
        c.result = result;
        c
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn weights_by_credit_units() {
        let courses = [
            course(4, 8.0, CourseResult::Approved),
            course(2, 6.0, CourseResult::Approved),
        ];
        // (4*8 + 2*6) / 6 = 7.333...
        assert_close(compute_term_cum(&courses), 7.3);
    }

    #[test]
    fn failed_and_withdrawn_courses_are_excluded() {
        let courses = [
            course(4, 8.0, CourseResult::Approved),
            course(2, 6.0, CourseResult::Approved),
            course(10, 2.0, CourseResult::Failed),
            course(3, 9.5, CourseResult::Withdrawn),
        ];
        assert_close(compute_term_cum(&courses), 7.3);
    }

    #[test]
    fn nothing_qualifying_yields_zero() {
        let none: [Course; 0] = [];
        assert_close(compute_general_cum(&none), 0.0);
        let failed = [course(4, 5.9, CourseResult::Failed)];
        assert_close(compute_term_cum(&failed), 0.0);
    }

    #[test]
    fn general_cum_is_not_an_average_of_term_cums() {
        // Term A: one 2-UV course at 10.0; term B: one 8-UV course at 6.0.
        // Averaging term CUMs would give 8.0; the credit-weighted CUM is 6.8.
        let courses = [
            course(2, 10.0, CourseResult::Approved),
            course(8, 6.0, CourseResult::Approved),
        ];
        assert_close(compute_general_cum(&courses), 6.8);
    }

    #[test]
    fn inscribible_uv_tiers() {
        assert_eq!(compute_inscribible_uvs(0.0), 20);
        assert_eq!(compute_inscribible_uvs(3.2), 16);
        assert_eq!(compute_inscribible_uvs(5.99), 16);
        assert_eq!(compute_inscribible_uvs(6.0), 20);
        assert_eq!(compute_inscribible_uvs(6.99), 20);
        assert_eq!(compute_inscribible_uvs(7.0), 24);
        assert_eq!(compute_inscribible_uvs(7.49), 24);
        assert_eq!(compute_inscribible_uvs(7.5), 32);
        assert_eq!(compute_inscribible_uvs(8.99), 32);
        assert_eq!(compute_inscribible_uvs(10.0), 32);
    }
}
