//! Statistics and scholarship command handlers

use cum_tracker::config::Config;
use cum_tracker::core::scholarship::estimate_recontribution;
use cum_tracker::core::AcademicStore;

/// Print the dashboard statistics
pub fn run(store: &AcademicStore, json: bool) -> Result<(), String> {
    let stats = store.statistics();
    if json {
        let text = serde_json::to_string_pretty(stats).map_err(|e| format!("✗ {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!("\n=== Dashboard ===\n");
    println!("  General CUM:       {:.2}", stats.general_cum);
    println!("  General average:   {:.1}", stats.general_average);
    println!("  Enrollable UVs:    {}", stats.inscribible_uvs);
    println!("  Terms:             {}", stats.term_count);
    println!(
        "  Courses:           {} approved, {} failed, {} withdrawn, {} pending",
        stats.approved_courses, stats.failed_courses, stats.withdrawn_courses, stats.pending_courses
    );
    Ok(())
}

/// Print the recontribution estimate for the recorded (or given) CUM
pub fn scholarship(store: &AcademicStore, config: &Config, cum: Option<f64>) -> Result<(), String> {
    let cum = match cum {
        Some(cum) if !(0.0..=10.0).contains(&cum) => {
            return Err(format!("✗ CUM must be between 0 and 10, got {cum}"));
        }
        Some(cum) => cum,
        None => store.statistics().general_cum,
    };
    let estimate = estimate_recontribution(cum, config.scholarship.base_amount);

    println!("\n=== Scholarship Recontribution ===\n");
    println!("  CUM:               {:.2}", estimate.cum);
    println!("  Tier:              {}", estimate.tier.description());
    println!("  Base amount:       ${:.2}", estimate.base_amount);
    println!("  Share to return:   {:.0}%", estimate.percentage);
    println!("  Amount to return:  ${:.2}", estimate.amount);
    Ok(())
}
