//! Export, import and wipe command handlers

use super::confirm;
use chrono::Local;
use cum_tracker::config::Config;
use cum_tracker::core::snapshot::{export_file_name, write_snapshot_file};
use cum_tracker::core::AcademicStore;
use cum_tracker::{error, info};
use std::path::{Path, PathBuf};

/// Write every record to a snapshot file
pub fn export(store: &AcademicStore, config: &Config, file: Option<&Path>) -> Result<(), String> {
    let path = file.map_or_else(
        || PathBuf::from(&config.paths.exports_dir).join(export_file_name(Local::now().date_naive())),
        Path::to_path_buf,
    );
    let snapshot = store.export_snapshot();
    write_snapshot_file(&path, &snapshot).map_err(|e| {
        error!("Export failed: {e}");
        format!("✗ {e}")
    })?;
    println!(
        "✓ Exported {} courses and {} terms to {}",
        snapshot.courses.len(),
        snapshot.semesters.len(),
        path.display()
    );
    Ok(())
}

/// Replace every record with the contents of a snapshot file
pub fn import(store: &mut AcademicStore, file: &Path, yes: bool) -> Result<(), String> {
    let has_records = !store.courses().is_empty() || !store.terms().is_empty();
    if has_records && !yes && !confirm("Importing replaces every course and term. Continue?") {
        println!("✗ Import cancelled");
        return Ok(());
    }

    let summary = store.import_file(file).map_err(|e| {
        error!("Import of {} failed: {e}", file.display());
        format!("✗ {e}")
    })?;
    info!("Imported {}", file.display());
    println!(
        "✓ Imported {} courses and {} terms",
        summary.courses, summary.terms
    );
    Ok(())
}

/// Delete every course and term
pub fn wipe(store: &mut AcademicStore, yes: bool) -> Result<(), String> {
    if !yes && !confirm("Delete every course and term? This cannot be undone.") {
        println!("✗ Wipe cancelled");
        return Ok(());
    }
    store
        .replace_all(Vec::new(), Vec::new())
        .map_err(|e| format!("✗ {e}"))?;
    println!("✓ All records deleted");
    Ok(())
}
