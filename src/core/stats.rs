//! Statistics reducer: dashboard figures derived from the full record

use crate::core::cum::{compute_general_cum, compute_inscribible_uvs, compute_term_cum};
use crate::core::grades::round_one_decimal;
use crate::core::models::{Course, CourseResult, Term};
use serde::Serialize;

/// Dashboard statistics, recomputed from scratch after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    /// Courses whose result is `approved`
    pub approved_courses: usize,
    /// Courses whose result is `failed`
    pub failed_courses: usize,
    /// Courses whose result is `withdrawn`
    pub withdrawn_courses: usize,
    /// Courses still `pending`
    pub pending_courses: usize,
    /// Number of terms on record
    pub term_count: usize,
    /// Mean final grade over non-withdrawn courses, one decimal
    pub general_average: f64,
    /// Credit-weighted CUM over approved courses
    #[serde(rename = "generalCUM")]
    pub general_cum: f64,
    /// Enrollment ceiling for next term
    #[serde(rename = "inscribibleUVs")]
    pub inscribible_uvs: u32,
}

impl Default for StatisticsSnapshot {
    fn default() -> Self {
        compute_statistics(&[], &[])
    }
}

/// Compute the statistics snapshot. Pure; empty inputs give the new-student
/// snapshot (all zeros, 20 enrollable UVs).
#[must_use]
pub fn compute_statistics(courses: &[Course], terms: &[Term]) -> StatisticsSnapshot {
    let count = |result: CourseResult| courses.iter().filter(|c| c.result == result).count();

    let graded: Vec<f64> = courses
        .iter()
        .filter(|c| c.result != CourseResult::Withdrawn)
        .map(|c| c.final_grade)
        .collect();
    let general_average = if graded.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = graded.len() as f64;
        round_one_decimal(graded.iter().sum::<f64>() / n)
    };

    let general_cum = compute_general_cum(
        courses
            .iter()
            .filter(|c| c.result == CourseResult::Approved),
    );

    StatisticsSnapshot {
        approved_courses: count(CourseResult::Approved),
        failed_courses: count(CourseResult::Failed),
        withdrawn_courses: count(CourseResult::Withdrawn),
        pending_courses: count(CourseResult::Pending),
        term_count: terms.len(),
        general_average,
        general_cum,
        inscribible_uvs: compute_inscribible_uvs(general_cum),
    }
}

/// Per-term breakdown shown next to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSummary {
    /// Term id
    pub term_id: String,
    /// Display label ("Ciclo 1 / 2025")
    pub label: String,
    /// Courses in the term, any result
    pub course_count: usize,
    /// UVs of non-withdrawn courses
    pub enrolled_uvs: u64,
    /// UVs of courses counting toward the CUM
    pub approved_uvs: u64,
    /// Credit-weighted CUM of the term
    pub cum: f64,
}

/// One summary per term, in term order. Detached courses belong to no term and
/// are left out.
#[must_use]
pub fn term_summaries(courses: &[Course], terms: &[Term]) -> Vec<TermSummary> {
    terms
        .iter()
        .map(|term| {
            let in_term: Vec<&Course> = courses
                .iter()
                .filter(|c| c.semester_id == term.id)
                .collect();
            let enrolled_uvs = in_term
                .iter()
                .filter(|c| !c.is_withdrawn())
                .map(|c| u64::from(c.uvs))
                .sum();
            let approved_uvs = in_term
                .iter()
                .filter(|c| crate::core::cum::counts_toward_cum(c))
                .map(|c| u64::from(c.uvs))
                .sum();
            TermSummary {
                term_id: term.id.clone(),
                label: term.label(),
                course_count: in_term.len(),
                enrolled_uvs,
                approved_uvs,
                cum: compute_term_cum(in_term.iter().copied()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{NewCourse, NewTerm};

    fn course(id: &str, term: &str, uvs: u32, final_grade: f64, result: CourseResult) -> Course {
        let mut c = Course::from_draft(
            id.to_string(),
            NewCourse {
                code: id.to_uppercase(),
                name: id.to_string(),
                enrollment: "1".to_string(),
                uvs,
                semester_id: term.to_string(),
                withdrawn: false,
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
    fn empty_record_is_new_student() {
        let stats = compute_statistics(&[], &[]);
        assert_eq!(stats.approved_courses, 0);
        assert_eq!(stats.failed_courses, 0);
        assert_eq!(stats.withdrawn_courses, 0);
        assert_close(stats.general_average, 0.0);
        assert_close(stats.general_cum, 0.0);
        assert_eq!(stats.inscribible_uvs, 20);
        assert_eq!(StatisticsSnapshot::default(), stats);
    }

    #[test]
    fn counts_and_averages() {
        let courses = vec![
            course("a", "t1", 4, 8.0, CourseResult::Approved),
            course("b", "t1", 2, 6.0, CourseResult::Approved),
            course("c", "t1", 3, 4.0, CourseResult::Failed),
            course("d", "t1", 4, 9.0, CourseResult::Withdrawn),
        ];
        let stats = compute_statistics(&courses, &[]);
        assert_eq!(stats.approved_courses, 2);
        assert_eq!(stats.failed_courses, 1);
        assert_eq!(stats.withdrawn_courses, 1);
        // (8 + 6 + 4) / 3
        assert_close(stats.general_average, 6.0);
        assert_close(stats.general_cum, 7.3);
        assert_eq!(stats.inscribible_uvs, 24);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let courses = vec![
            course("a", "t1", 3, 7.7, CourseResult::Approved),
            course("b", "t2", 5, 8.3, CourseResult::Approved),
        ];
        assert_eq!(
            compute_statistics(&courses, &[]),
            compute_statistics(&courses, &[])
        );
    }

    #[test]
    fn serializes_with_dashboard_keys() {
        let json = serde_json::to_string(&compute_statistics(&[], &[])).expect("serialize");
        assert!(json.contains("\"generalCUM\""));
        assert!(json.contains("\"inscribibleUVs\""));
        assert!(json.contains("\"approvedCourses\""));
    }

    #[test]
    fn summaries_follow_term_order_and_skip_detached() {
        let terms = vec![
            Term::from_draft("t1".to_string(), NewTerm::new("Ciclo 1", "2025")),
            Term::from_draft("t2".to_string(), NewTerm::new("Ciclo 2", "2025")),
        ];
        let courses = vec![
            course("a", "t1", 4, 8.0, CourseResult::Approved),
            course("b", "t1", 2, 6.0, CourseResult::Approved),
            course("c", "t2", 3, 5.0, CourseResult::Failed),
            course("d", "t2", 4, 0.0, CourseResult::Withdrawn),
            course("e", "", 4, 10.0, CourseResult::Approved),
        ];
        let summaries = term_summaries(&courses, &terms);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].label, "Ciclo 1 / 2025");
        assert_eq!(summaries[0].course_count, 2);
        assert_eq!(summaries[0].approved_uvs, 6);
        assert_close(summaries[0].cum, 7.3);
        assert_eq!(summaries[1].course_count, 2);
        assert_eq!(summaries[1].enrolled_uvs, 3);
        assert_eq!(summaries[1].approved_uvs, 0);
        assert_close(summaries[1].cum, 0.0);
    }

    #[test]
    fn summaries_hold_large_credit_totals() {
        let terms = vec![Term::from_draft(
            "t1".to_string(),
            NewTerm::new("Ciclo 1", "2025"),
        )];
        let courses = vec![
            course("a", "t1", u32::MAX, 8.0, CourseResult::Approved),
            course("b", "t1", 2, 7.0, CourseResult::Approved),
        ];
        let summaries = term_summaries(&courses, &terms);
        assert_eq!(summaries[0].enrolled_uvs, u64::from(u32::MAX) + 2);
        assert_eq!(summaries[0].approved_uvs, u64::from(u32::MAX) + 2);
    }
}
