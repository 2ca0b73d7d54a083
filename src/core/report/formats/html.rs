//! HTML report generator
//!
//! Produces a single self-contained page with embedded CSS.

use crate::core::report::{substitute_summary, write_report, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;
use std::path::Path;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        substitute_summary(HTML_TEMPLATE, ctx)
            .replace("{{term_table}}", &Self::generate_term_html(ctx))
            .replace("{{course_table}}", &Self::generate_course_html(ctx))
    }

    fn generate_term_html(ctx: &ReportContext) -> String {
        if ctx.summaries.is_empty() {
            return "<p><em>No terms yet.</em></p>".to_string();
        }
        let mut html = String::from(
            "<table>\n<tr><th>Term</th><th>Courses</th><th>Enrolled UVs</th><th>Approved UVs</th><th>CUM</th></tr>\n",
        );
        for summary in &ctx.summaries {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                escape_html(&summary.label),
                summary.course_count,
                summary.enrolled_uvs,
                summary.approved_uvs,
                summary.cum
            );
        }
        html.push_str("</table>");
        html
    }

    fn generate_course_html(ctx: &ReportContext) -> String {
        if ctx.courses.is_empty() {
            return "<p><em>No courses yet.</em></p>".to_string();
        }
        let mut html = String::from(
            "<table>\n<tr><th>Code</th><th>Name</th><th>Term</th><th>UVs</th><th>Activities</th><th>Grade</th><th>Result</th></tr>\n",
        );
        for course in ctx.courses {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td><td class=\"{}\">{}</td></tr>",
                escape_html(&course.code),
                escape_html(&course.name),
                escape_html(&ctx.term_label(course)),
                course.uvs,
                course.activities.len(),
                course.final_grade,
                course.result.as_str(),
                course.result
            );
        }
        html.push_str("</table>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
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
    use crate::core::models::NewCourse;
    use crate::core::AcademicStore;

    #[test]
    fn escapes_course_names() {
        let mut store = AcademicStore::in_memory();
        store.add_course(NewCourse {
            code: "PRN115".to_string(),
            name: "<Programación> & Datos".to_string(),
            enrollment: "1".to_string(),
            uvs: 4,
            ..NewCourse::default()
        });
        let ctx = ReportContext::from_store(&store, 4964.0);
        let out = HtmlReporter::new().render(&ctx).expect("render");
        assert!(out.contains("&lt;Programación&gt; &amp; Datos"));
        assert!(out.contains("class=\"pending\""));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn generate_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/dashboard.html");
        let store = AcademicStore::in_memory();
        let ctx = ReportContext::from_store(&store, 4964.0);
        HtmlReporter::new().generate(&ctx, &path).expect("write");
        assert!(path.exists());
    }
}
