//! Markdown report generator
//!
//! Plain tables that render in any Markdown viewer.

use crate::core::report::{substitute_summary, write_report, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/dashboard.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        substitute_summary(MARKDOWN_TEMPLATE, ctx)
            .replace("{{term_table}}", &Self::generate_term_table(ctx))
            .replace("{{course_table}}", &Self::generate_course_table(ctx))
    }

    /// Generate the per-term table
    fn generate_term_table(ctx: &ReportContext) -> String {
        if ctx.summaries.is_empty() {
            return "_No terms yet._\n".to_string();
        }
        let mut table = String::new();
        table.push_str("| Term | Courses | Enrolled UVs | Approved UVs | CUM |\n");
        table.push_str("|---|---|---|---|---|\n");
        for summary in &ctx.summaries {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {:.2} |",
                escape_cell(&summary.label),
                summary.course_count,
                summary.enrolled_uvs,
                summary.approved_uvs,
                summary.cum
            );
        }
        table
    }

    /// Generate the course table in insertion order
    fn generate_course_table(ctx: &ReportContext) -> String {
        if ctx.courses.is_empty() {
            return "_No courses yet._\n".to_string();
        }
        let mut table = String::new();
        table.push_str("| Code | Name | Term | UVs | Activities | Grade | Result |\n");
        table.push_str("|---|---|---|---|---|---|---|\n");
        for course in ctx.courses {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} | {:.1} | {} |",
                escape_cell(&course.code),
                escape_cell(&course.name),
                escape_cell(&ctx.term_label(course)),
                course.uvs,
                course.activities.len(),
                course.final_grade,
                course.result
            );
        }
        table
    }
}

/// Pipes would end the table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        write_report(output_path, &report_content)
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{NewActivity, NewCourse, NewTerm};
    use crate::core::AcademicStore;

    #[test]
    fn renders_every_placeholder() {
        let mut store = AcademicStore::in_memory();
        let (_, course) = store.add_course_in_new_term(
            NewTerm::new("Ciclo 1", "2025"),
            NewCourse {
                code: "MAT115".to_string(),
                name: "Matemática | I".to_string(),
                enrollment: "1".to_string(),
                uvs: 4,
                ..NewCourse::default()
            },
        );
        store
            .add_activity(&course.id, NewActivity::new("Final", 100.0, 8.0))
            .expect("valid");

        let ctx = ReportContext::from_store(&store, 4964.0);
        let out = MarkdownReporter::new().render(&ctx).expect("render");
        assert!(!out.contains("{{"), "unfilled placeholder in:\n{out}");
        assert!(out.contains("Ciclo 1 / 2025"));
        assert!(out.contains("Matemática \\| I"));
        assert!(out.contains("**8.00**"));
        assert!(out.contains("$496.40"));
    }

    #[test]
    fn empty_store_renders_placeholders_text() {
        let store = AcademicStore::in_memory();
        let ctx = ReportContext::from_store(&store, 4964.0);
        let out = MarkdownReporter::new().render(&ctx).expect("render");
        assert!(out.contains("_No courses yet._"));
        assert!(out.contains("_No terms yet._"));
        assert!(out.contains("| Enrollable UVs next term | 20 |"));
    }
}
