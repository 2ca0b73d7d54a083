//! Course command handlers

use super::{resolve_course, resolve_term, short_id};
use crate::args::CourseSubcommand;
use cum_tracker::core::models::{Course, CoursePatch, NewCourse, NewTerm};
use cum_tracker::core::validate::{check_enrollment, check_new_course, check_new_term};
use cum_tracker::core::AcademicStore;
use cum_tracker::{info, warn};

/// Dispatch course subcommands
pub fn run(subcommand: CourseSubcommand, store: &mut AcademicStore) -> Result<(), String> {
    match subcommand {
        CourseSubcommand::Add {
            code,
            name,
            uvs,
            enrollment,
            term,
            new_term,
            year,
            withdrawn,
        } => {
            let mut draft = NewCourse {
                code,
                name,
                enrollment,
                uvs,
                semester_id: String::new(),
                withdrawn,
            };
            check_new_course(&draft).map_err(|e| format!("✗ {e}"))?;

            let course = match (new_term, year) {
                (Some(name), Some(year)) => {
                    let term = NewTerm::new(name, year);
                    check_new_term(&term).map_err(|e| format!("✗ {e}"))?;
                    let (term, course) = store.add_course_in_new_term(term, draft);
                    println!("✓ Added term {} [{}]", term.label(), short_id(&term.id));
                    course
                }
                _ => {
                    if let Some(key) = term {
                        draft.semester_id = resolve_term(store, &key)?;
                    }
                    store.add_course(draft)
                }
            };
            info!("Course added: {}", course.id);
            println!(
                "✓ Added {} {} [{}] ({})",
                course.code,
                course.name,
                short_id(&course.id),
                course.result
            );
            Ok(())
        }
        CourseSubcommand::List { term } => {
            let term_id = match term {
                Some(key) => Some(resolve_term(store, &key)?),
                None => None,
            };
            list(store, term_id.as_deref());
            Ok(())
        }
        CourseSubcommand::Show { course } => {
            let id = resolve_course(store, &course)?;
            if let Some(course) = store.course(&id) {
                show(store, course);
            }
            Ok(())
        }
        CourseSubcommand::Update {
            course,
            code,
            name,
            enrollment,
            uvs,
            term,
            detach,
            grade,
            result,
        } => {
            let id = resolve_course(store, &course)?;
            if let Some(enrollment) = &enrollment {
                check_enrollment(enrollment).map_err(|e| format!("✗ {e}"))?;
            }
            if uvs == Some(0) {
                return Err("✗ uvs must be greater than zero".to_string());
            }
            if let Some(grade) = grade {
                if !(0.0..=10.0).contains(&grade) {
                    return Err(format!("✗ grade must be between 0 and 10, got {grade}"));
                }
            }
            let semester_id = if detach {
                Some(String::new())
            } else if let Some(key) = term {
                Some(resolve_term(store, &key)?)
            } else {
                None
            };
            if grade.is_some() || result.is_some() {
                warn!("Storing caller-provided grade/result for {id}; activities are not consulted");
            }
            let patch = CoursePatch {
                code,
                name,
                enrollment,
                uvs,
                semester_id,
                final_grade: grade,
                result: result.map(Into::into),
            };
            store.update_course(&id, patch);
            println!("✓ Updated course [{}]", short_id(&id));
            Ok(())
        }
        CourseSubcommand::Withdraw { course } => set_withdrawn(store, &course, true),
        CourseSubcommand::Reinstate { course } => set_withdrawn(store, &course, false),
        CourseSubcommand::Delete { course } => {
            let id = resolve_course(store, &course)?;
            store.delete_course(&id);
            println!("✓ Deleted course [{}]", short_id(&id));
            Ok(())
        }
    }
}

fn set_withdrawn(store: &mut AcademicStore, key: &str, withdrawn: bool) -> Result<(), String> {
    let id = resolve_course(store, key)?;
    store.set_withdrawn(&id, withdrawn);
    if let Some(course) = store.course(&id) {
        println!("✓ {} is now {}", course.code, course.result);
    }
    Ok(())
}

fn list(store: &AcademicStore, term_id: Option<&str>) {
    let courses: Vec<&Course> = store
        .courses()
        .iter()
        .filter(|c| term_id.map_or(true, |id| c.semester_id == id))
        .collect();
    if courses.is_empty() {
        println!("No courses yet.");
        return;
    }
    println!(
        "{:<10} {:<10} {:<32} {:>4} {:>6} {:<10}",
        "ID", "CODE", "NAME", "UVS", "GRADE", "RESULT"
    );
    for course in courses {
        println!(
            "{:<10} {:<10} {:<32} {:>4} {:>6.1} {:<10}",
            short_id(&course.id),
            course.code,
            course.name,
            course.uvs,
            course.final_grade,
            course.result.as_str()
        );
    }
}

fn show(store: &AcademicStore, course: &Course) {
    let term = store
        .term(&course.semester_id)
        .map_or_else(|| "-".to_string(), |t| t.label());
    println!("{} {}", course.code, course.name);
    println!("  id:         {}", course.id);
    println!("  term:       {term}");
    println!("  enrollment: {}", course.enrollment);
    println!("  uvs:        {}", course.uvs);
    println!("  grade:      {:.1}", course.final_grade);
    println!("  result:     {}", course.result);

    if course.activities.is_empty() {
        println!("\n  No activities yet.");
        return;
    }
    println!("\n  {:<10} {:<24} {:>6} {:>6} {:>8}", "ID", "ACTIVITY", "%", "GRADE", "WEIGHTED");
    for activity in &course.activities {
        println!(
            "  {:<10} {:<24} {:>6.1} {:>6.1} {:>8.2}",
            short_id(&activity.id),
            activity.name,
            activity.percentage,
            activity.grade,
            activity.weighted_grade()
        );
        if let Some(description) = &activity.description {
            println!("             {description}");
        }
    }
    println!("  {:<35} {:>6.1}", "total", course.percentage_total());
}
