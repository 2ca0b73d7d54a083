//! Activity command handlers

use super::{resolve_course, short_id};
use crate::args::ActivitySubcommand;
use cum_tracker::core::models::{ActivityPatch, Course, NewActivity};
use cum_tracker::core::AcademicStore;
use cum_tracker::debug;

/// Dispatch activity subcommands
pub fn run(subcommand: ActivitySubcommand, store: &mut AcademicStore) -> Result<(), String> {
    match subcommand {
        ActivitySubcommand::Add {
            course,
            name,
            percentage,
            grade,
            description,
        } => {
            let course_id = resolve_course(store, &course)?;
            let draft = NewActivity {
                name,
                description,
                percentage,
                grade,
            };
            let added = store
                .add_activity(&course_id, draft)
                .map_err(|e| format!("✗ {e}"))?;
            if let Some(activity) = added {
                println!(
                    "✓ Added {} ({}% at {:.1}) [{}]",
                    activity.name,
                    activity.percentage,
                    activity.grade,
                    short_id(&activity.id)
                );
            }
            report_course(store, &course_id);
            Ok(())
        }
        ActivitySubcommand::Update {
            course,
            activity,
            name,
            percentage,
            grade,
            description,
        } => {
            let course_id = resolve_course(store, &course)?;
            let activity_id = resolve_activity(store, &course_id, &activity)?;
            let patch = ActivityPatch {
                name,
                description: description.map(|d| (!d.is_empty()).then_some(d)),
                percentage,
                grade,
            };
            store
                .update_activity(&course_id, &activity_id, patch)
                .map_err(|e| format!("✗ {e}"))?;
            println!("✓ Updated activity [{}]", short_id(&activity_id));
            report_course(store, &course_id);
            Ok(())
        }
        ActivitySubcommand::Delete { course, activity } => {
            let course_id = resolve_course(store, &course)?;
            let activity_id = resolve_activity(store, &course_id, &activity)?;
            store.delete_activity(&course_id, &activity_id);
            println!("✓ Deleted activity [{}]", short_id(&activity_id));
            report_course(store, &course_id);
            Ok(())
        }
    }
}

/// Activity by exact id, unique id prefix, or unique name (case-insensitive)
fn resolve_activity(store: &AcademicStore, course_id: &str, key: &str) -> Result<String, String> {
    let course: &Course = store
        .course(course_id)
        .ok_or_else(|| format!("✗ No course '{course_id}'"))?;
    if let Some(activity) = course.activity(key) {
        return Ok(activity.id.clone());
    }
    let single = |matches: Vec<&str>| (matches.len() == 1).then(|| matches[0].to_string());
    single(
        course
            .activities
            .iter()
            .filter(|a| a.id.starts_with(key))
            .map(|a| a.id.as_str())
            .collect(),
    )
    .or_else(|| {
        single(
            course
                .activities
                .iter()
                .filter(|a| a.name.eq_ignore_ascii_case(key))
                .map(|a| a.id.as_str())
                .collect(),
        )
    })
    .ok_or_else(|| format!("✗ No single activity of {} matches '{key}'", course.code))
}

fn report_course(store: &AcademicStore, course_id: &str) {
    if let Some(course) = store.course(course_id) {
        debug!("{} activities total {}%", course.code, course.percentage_total());
        println!(
            "  {} now at {:.1} ({}), {}% evaluated",
            course.code,
            course.final_grade,
            course.result,
            course.percentage_total()
        );
    }
}
