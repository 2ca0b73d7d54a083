//! Academic store: the single owner of courses and terms
//!
//! Every mutation applies its structural change, re-derives whatever depends on
//! it, recomputes the statistics snapshot and schedules persistence, in that
//! order, before returning. Lookup misses are no-ops reported through `bool` or
//! `Option` returns.

use crate::core::error::{ImportError, ValidationError};
use crate::core::grades::{refresh_derived, MAX_GRADE};
use crate::core::models::{
    new_id, Activity, ActivityPatch, Course, CoursePatch, CourseResult, DeletePolicy,
    NewActivity, NewCourse, NewTerm, Term, TermPatch,
};
use crate::core::persistence::{KeyValueStore, PersistenceGateway};
use crate::core::snapshot::{self, Snapshot};
use crate::core::stats::{compute_statistics, term_summaries, StatisticsSnapshot, TermSummary};
use crate::core::validate;
use crate::{debug, info, warn};
use std::path::Path;

/// Counts reported after a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Courses now on record
    pub courses: usize,
    /// Terms now on record
    pub terms: usize,
}

/// In-memory owner of the academic record, backed by a persistence gateway
#[derive(Debug)]
pub struct AcademicStore {
    courses: Vec<Course>,
    terms: Vec<Term>,
    stats: StatisticsSnapshot,
    gateway: PersistenceGateway,
}

impl AcademicStore {
    /// Empty store writing through `gateway`
    #[must_use]
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self::with_records(gateway, Vec::new(), Vec::new())
    }

    /// Store holding `courses` and `terms`, e.g. as loaded at startup.
    ///
    /// Derived fields of courses with activities are recomputed and statistics
    /// are computed immediately. Nothing is written back until the first mutation.
    #[must_use]
    pub fn with_records(gateway: PersistenceGateway, mut courses: Vec<Course>, terms: Vec<Term>) -> Self {
        if let Err(e) = validate::check_collections(&courses, &terms) {
            warn!("Loaded records are inconsistent: {e}");
        }
        courses.iter_mut().for_each(normalize);
        let stats = compute_statistics(&courses, &terms);
        Self {
            courses,
            terms,
            stats,
            gateway,
        }
    }

    /// Load from `store` and keep writing to it
    #[must_use]
    pub fn open<S: KeyValueStore>(store: S) -> Self {
        let (gateway, loaded) = PersistenceGateway::start(store);
        info!(
            "Loaded {} courses and {} terms",
            loaded.courses.len(),
            loaded.terms.len()
        );
        Self::with_records(gateway, loaded.courses, loaded.terms)
    }

    /// Store without durable backing
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(PersistenceGateway::detached())
    }

    // --- Queries ---

    /// All courses, in insertion order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All terms, in insertion order
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Course by id
    #[must_use]
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    /// Term by id
    #[must_use]
    pub fn term(&self, term_id: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == term_id)
    }

    /// Courses attached to a term
    pub fn courses_in_term<'a>(&'a self, term_id: &'a str) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses.iter().filter(move |c| c.semester_id == term_id)
    }

    /// Course by exact id, unique id prefix, or unique code (case-insensitive)
    #[must_use]
    pub fn find_course(&self, key: &str) -> Option<&Course> {
        self.course(key)
            .or_else(|| unique(self.courses.iter().filter(|c| c.id.starts_with(key))))
            .or_else(|| unique(self.courses.iter().filter(|c| c.code.eq_ignore_ascii_case(key))))
    }

    /// Term by exact id or unique id prefix
    #[must_use]
    pub fn find_term(&self, key: &str) -> Option<&Term> {
        self.term(key)
            .or_else(|| unique(self.terms.iter().filter(|t| t.id.starts_with(key))))
    }

    /// Latest statistics snapshot
    #[must_use]
    pub const fn statistics(&self) -> &StatisticsSnapshot {
        &self.stats
    }

    /// Per-term breakdown
    #[must_use]
    pub fn term_summaries(&self) -> Vec<TermSummary> {
        term_summaries(&self.courses, &self.terms)
    }

    // --- Courses ---

    /// Add a course with a fresh id, no activities, grade 0 and result `pending`
    /// (or `withdrawn` when the draft says so)
    pub fn add_course(&mut self, draft: NewCourse) -> Course {
        let course = Course::from_draft(new_id(), draft);
        debug!("Adding course {} ({})", course.code, course.id);
        self.courses.push(course.clone());
        self.commit_courses();
        course
    }

    /// Create a term and a course inside it in one step
    pub fn add_course_in_new_term(&mut self, term: NewTerm, mut course: NewCourse) -> (Term, Course) {
        let term = self.add_term(term);
        course.semester_id.clone_from(&term.id);
        let course = self.add_course(course);
        (term, course)
    }

    /// Shallow-merge `patch` into a course. Derived fields are **not** recomputed;
    /// callers changing the outcome pass `result`/`final_grade` themselves.
    /// A non-finite grade or zero UVs in the patch is ignored, and a finite
    /// grade is clamped to the 0-10 scale.
    pub fn update_course(&mut self, course_id: &str, mut patch: CoursePatch) -> bool {
        sanitize_patch(course_id, &mut patch);
        let Some(course) = self.course_mut(course_id) else {
            debug!("update_course: no course {course_id}");
            return false;
        };
        course.apply(patch);
        self.commit_courses();
        true
    }

    /// Set or clear the withdrawn status. Clearing it re-derives the result from
    /// the activities (`pending` when there are none).
    pub fn set_withdrawn(&mut self, course_id: &str, withdrawn: bool) -> bool {
        let Some(course) = self.course_mut(course_id) else {
            return false;
        };
        course.result = if withdrawn {
            CourseResult::Withdrawn
        } else {
            CourseResult::Pending
        };
        refresh_derived(course);
        debug!("Course {course_id} is now {}", course.result);
        self.commit_courses();
        true
    }

    /// Remove a course together with its activities
    pub fn delete_course(&mut self, course_id: &str) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != course_id);
        if self.courses.len() == before {
            return false;
        }
        debug!("Deleted course {course_id}");
        self.commit_courses();
        true
    }

    // --- Activities ---

    /// Append an activity to a course and re-derive the course's grade and result.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    /// Returns [`ValidationError`] without changing anything when a field is out of
    /// range or the course's percentages would exceed 100
    pub fn add_activity(
        &mut self,
        course_id: &str,
        draft: NewActivity,
    ) -> Result<Option<Activity>, ValidationError> {
        validate::check_activity_fields(&draft.name, draft.percentage, draft.grade)?;
        self.apply_activity_change(course_id, |activities| {
            validate::check_percentage_total(
                activities
                    .iter()
                    .map(|a| a.percentage)
                    .chain(std::iter::once(draft.percentage)),
            )?;
            let activity = Activity::from_draft(new_id(), draft);
            activities.push(activity.clone());
            Ok(Some(activity))
        })
    }

    /// Merge `patch` into an activity and re-derive the course's grade and result.
    ///
    /// Returns `Ok(false)` when the course or activity does not exist.
    ///
    /// # Errors
    /// Returns [`ValidationError`] without changing anything when the patched
    /// activity is invalid or the course's percentages would exceed 100
    pub fn update_activity(
        &mut self,
        course_id: &str,
        activity_id: &str,
        patch: ActivityPatch,
    ) -> Result<bool, ValidationError> {
        let outcome = self.apply_activity_change(course_id, |activities| {
            let Some(index) = activities.iter().position(|a| a.id == activity_id) else {
                return Ok(None);
            };
            let mut updated = activities[index].clone();
            updated.apply(patch);
            validate::check_activity_fields(&updated.name, updated.percentage, updated.grade)?;
            validate::check_percentage_total(activities.iter().enumerate().map(|(i, a)| {
                if i == index {
                    updated.percentage
                } else {
                    a.percentage
                }
            }))?;
            activities[index] = updated;
            Ok(Some(()))
        })?;
        Ok(outcome.is_some())
    }

    /// Remove an activity and re-derive the course's grade and result from the rest
    pub fn delete_activity(&mut self, course_id: &str, activity_id: &str) -> bool {
        let outcome = self.apply_activity_change(course_id, |activities| {
            let before = activities.len();
            activities.retain(|a| a.id != activity_id);
            Ok((activities.len() < before).then_some(()))
        });
        matches!(outcome, Ok(Some(())))
    }

    /// The only path that touches a course's activities. `change` returns
    /// `Some` when it modified them; the derived fields are then recomputed and the
    /// change committed. A validation error must be raised before modifying.
    fn apply_activity_change<R, F>(
        &mut self,
        course_id: &str,
        change: F,
    ) -> Result<Option<R>, ValidationError>
    where
        F: FnOnce(&mut Vec<Activity>) -> Result<Option<R>, ValidationError>,
    {
        let Some(course) = self.course_mut(course_id) else {
            debug!("Activity change ignored: no course {course_id}");
            return Ok(None);
        };
        let outcome = change(&mut course.activities)?;
        if outcome.is_some() {
            refresh_derived(course);
            debug!(
                "Course {} now at {:.1} ({})",
                course.code, course.final_grade, course.result
            );
            self.commit_courses();
        }
        Ok(outcome)
    }

    // --- Terms ---

    /// Add a term with a fresh id and return it
    pub fn add_term(&mut self, draft: NewTerm) -> Term {
        let term = Term::from_draft(new_id(), draft);
        debug!("Adding term {} ({})", term.label(), term.id);
        self.terms.push(term.clone());
        self.commit_terms();
        term
    }

    /// Shallow-merge `patch` into a term
    pub fn update_term(&mut self, term_id: &str, patch: TermPatch) -> bool {
        let Some(term) = self.terms.iter_mut().find(|t| t.id == term_id) else {
            return false;
        };
        term.apply(patch);
        self.commit_terms();
        true
    }

    /// Remove a term; its courses are deleted (`Cascade`) or detached (`Detach`)
    pub fn delete_term(&mut self, term_id: &str, policy: DeletePolicy) -> bool {
        let before = self.terms.len();
        self.terms.retain(|t| t.id != term_id);
        if self.terms.len() == before {
            return false;
        }

        let affected = self.courses.iter().filter(|c| c.semester_id == term_id).count();
        match policy {
            DeletePolicy::Cascade => self.courses.retain(|c| c.semester_id != term_id),
            DeletePolicy::Detach => self
                .courses
                .iter_mut()
                .filter(|c| c.semester_id == term_id)
                .for_each(|c| c.semester_id.clear()),
        }
        debug!("Deleted term {term_id} ({policy}, {affected} courses affected)");

        self.recompute_statistics();
        self.gateway.persist_terms(&self.terms);
        if affected > 0 {
            self.gateway.persist_courses(&self.courses);
        }
        true
    }

    // --- Bulk ---

    /// Re-derive and publish the statistics snapshot from the current records
    pub fn recompute_statistics(&mut self) -> &StatisticsSnapshot {
        self.stats = compute_statistics(&self.courses, &self.terms);
        &self.stats
    }

    /// Replace both collections at once. Either both are validated and swapped in,
    /// or nothing changes. Statistics are recomputed immediately.
    ///
    /// # Errors
    /// Returns [`ValidationError`] when the new collections break a record rule
    pub fn replace_all(&mut self, mut courses: Vec<Course>, terms: Vec<Term>) -> Result<(), ValidationError> {
        validate::check_collections(&courses, &terms)?;
        courses.iter_mut().for_each(normalize);
        self.courses = courses;
        self.terms = terms;
        self.recompute_statistics();
        self.gateway.persist_courses(&self.courses);
        self.gateway.persist_terms(&self.terms);
        info!(
            "Replaced records: {} courses, {} terms",
            self.courses.len(),
            self.terms.len()
        );
        Ok(())
    }

    /// Current records as an export snapshot
    #[must_use]
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::new(self.courses.clone(), self.terms.clone())
    }

    /// Parse snapshot text and replace every record with it
    ///
    /// # Errors
    /// Returns [`ImportError`] and leaves the store untouched when the text is
    /// malformed or its records are invalid
    pub fn import_snapshot(&mut self, text: &str) -> Result<ImportSummary, ImportError> {
        let data = snapshot::parse_snapshot(text)?;
        self.apply_import(data.courses, data.terms)
    }

    /// Read a snapshot file and replace every record with it
    ///
    /// # Errors
    /// Returns [`ImportError`] and leaves the store untouched on any failure
    pub fn import_file(&mut self, path: &Path) -> Result<ImportSummary, ImportError> {
        let data = snapshot::read_snapshot_file(path)?;
        self.apply_import(data.courses, data.terms)
    }

    fn apply_import(&mut self, courses: Vec<Course>, terms: Vec<Term>) -> Result<ImportSummary, ImportError> {
        self.replace_all(courses, terms)?;
        Ok(ImportSummary {
            courses: self.courses.len(),
            terms: self.terms.len(),
        })
    }

    /// Block until scheduled writes have been attempted
    pub fn flush(&self) {
        self.gateway.flush();
    }

    fn course_mut(&mut self, course_id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == course_id)
    }

    fn commit_courses(&mut self) {
        self.recompute_statistics();
        self.gateway.persist_courses(&self.courses);
    }

    fn commit_terms(&mut self) {
        self.recompute_statistics();
        self.gateway.persist_terms(&self.terms);
    }
}

/// Courses with activities get their derived fields recomputed; the rest keep
/// whatever the caller stored.
fn normalize(course: &mut Course) {
    if !course.activities.is_empty() {
        refresh_derived(course);
    }
}

/// Drop patch values a stored course cannot hold
fn sanitize_patch(course_id: &str, patch: &mut CoursePatch) {
    if let Some(grade) = patch.final_grade {
        if grade.is_finite() {
            patch.final_grade = Some(grade.clamp(0.0, MAX_GRADE));
        } else {
            warn!("update_course {course_id}: ignoring non-finite finalGrade");
            patch.final_grade = None;
        }
    }
    if patch.uvs == Some(0) {
        warn!("update_course {course_id}: ignoring zero UVs");
        patch.uvs = None;
    }
}

fn unique<'a, T, I>(mut matches: I) -> Option<&'a T>
where
    I: Iterator<Item = &'a T>,
{
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}
