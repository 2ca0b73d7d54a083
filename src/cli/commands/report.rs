//! Report command handler
//!
//! Renders the dashboard in Markdown or HTML to a file or stdout.

use cum_tracker::config::Config;
use cum_tracker::core::report::{ReportContext, ReportFormat};
use cum_tracker::core::AcademicStore;
use cum_tracker::{error, info};
use std::path::{Path, PathBuf};

/// Run the report command
pub fn run(
    store: &AcademicStore,
    config: &Config,
    format: ReportFormat,
    output: Option<&Path>,
    stdout: bool,
) -> Result<(), String> {
    let ctx = ReportContext::from_store(store, config.scholarship.base_amount);
    let generator = format.generator();

    if stdout {
        let content = generator.render(&ctx).map_err(|e| format!("✗ {e}"))?;
        print!("{content}");
        return Ok(());
    }

    let path = output.map_or_else(|| default_report_path(config, format, &ctx), Path::to_path_buf);
    generator.generate(&ctx, &path).map_err(|e| {
        error!("Report generation failed for {}: {e}", path.display());
        format!("✗ Failed to write {}: {e}", path.display())
    })?;
    info!("Report written: {}", path.display());
    println!("✓ Report generated: {}", path.display());
    Ok(())
}

fn default_report_path(config: &Config, format: ReportFormat, ctx: &ReportContext) -> PathBuf {
    PathBuf::from(&config.paths.reports_dir).join(format!(
        "dashboard_{}.{}",
        ctx.generated_at.format("%Y-%m-%d"),
        format.extension()
    ))
}
