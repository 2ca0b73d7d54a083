//! Dashboard report generation
//!
//! Renders the statistics snapshot, term summaries, course table and scholarship
//! estimate as Markdown or self-contained HTML from compiled-in templates.

pub mod formats;

use crate::core::models::{Course, Term};
use crate::core::scholarship::{estimate_recontribution, ScholarshipEstimate};
use crate::core::stats::{StatisticsSnapshot, TermSummary};
use crate::core::store::AcademicStore;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
///
/// Aggregates everything a template needs so the renderers never touch the store.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Every course on record
    pub courses: &'a [Course],
    /// Every term on record
    pub terms: &'a [Term],
    /// Statistics snapshot at render time
    pub stats: &'a StatisticsSnapshot,
    /// Per-term breakdown
    pub summaries: Vec<TermSummary>,
    /// Recontribution estimate for the general CUM
    pub scholarship: ScholarshipEstimate,
    /// Render timestamp
    pub generated_at: DateTime<Local>,
}

impl<'a> ReportContext<'a> {
    /// Build a context from the store's current state
    #[must_use]
    pub fn from_store(store: &'a AcademicStore, base_amount: f64) -> Self {
        let stats = store.statistics();
        Self {
            courses: store.courses(),
            terms: store.terms(),
            stats,
            summaries: store.term_summaries(),
            scholarship: estimate_recontribution(stats.general_cum, base_amount),
            generated_at: Local::now(),
        }
    }

    /// Label of the term a course belongs to, or `-` when detached
    #[must_use]
    pub fn term_label(&self, course: &Course) -> String {
        self.terms
            .iter()
            .find(|t| t.id == course.semester_id)
            .map_or_else(|| "-".to_string(), Term::label)
    }

    /// Total UVs of courses that count toward the CUM
    #[must_use]
    pub fn approved_uvs(&self) -> u64 {
        self.courses
            .iter()
            .filter(|c| crate::core::cum::counts_toward_cum(c))
            .map(|c| u64::from(c.uvs))
            .sum()
    }

    /// Course count
    #[must_use]
    pub const fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Render timestamp formatted for headers
    #[must_use]
    pub fn generated_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

/// Write `content` to `output_path`, creating parent directories
pub(crate) fn write_report(output_path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, content)?;
    Ok(())
}

/// Substitute the placeholders shared by every template. Table placeholders are
/// left for the format-specific renderer.
pub(crate) fn substitute_summary(template: &str, ctx: &ReportContext) -> String {
    let stats = ctx.stats;
    let estimate = &ctx.scholarship;
    [
        ("{{generated_at}}", ctx.generated_label()),
        ("{{course_count}}", ctx.course_count().to_string()),
        ("{{term_count}}", stats.term_count.to_string()),
        ("{{general_cum}}", format!("{:.2}", stats.general_cum)),
        ("{{general_average}}", format!("{:.1}", stats.general_average)),
        ("{{inscribible_uvs}}", stats.inscribible_uvs.to_string()),
        ("{{approved_uvs}}", ctx.approved_uvs().to_string()),
        ("{{approved}}", stats.approved_courses.to_string()),
        ("{{failed}}", stats.failed_courses.to_string()),
        ("{{withdrawn}}", stats.withdrawn_courses.to_string()),
        ("{{pending}}", stats.pending_courses.to_string()),
        ("{{scholarship_description}}", estimate.tier.description().to_string()),
        ("{{base_amount}}", format!("{:.2}", estimate.base_amount)),
        ("{{scholarship_percentage}}", format!("{:.0}", estimate.percentage)),
        ("{{scholarship_amount}}", format!("{:.2}", estimate.amount)),
    ]
    .iter()
    .fold(template.to_string(), |output, (key, value)| output.replace(*key, value))
}
