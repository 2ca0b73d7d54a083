//! Term command handlers

use super::{confirm, resolve_term, short_id};
use crate::args::TermSubcommand;
use cum_tracker::core::models::{DeletePolicy, NewTerm, TermPatch};
use cum_tracker::core::validate::{check_new_term, check_year};
use cum_tracker::core::AcademicStore;
use cum_tracker::{info, verbose};

/// Dispatch term subcommands
pub fn run(subcommand: TermSubcommand, store: &mut AcademicStore) -> Result<(), String> {
    match subcommand {
        TermSubcommand::Add { name, year, number } => {
            let draft = NewTerm { name, year, number };
            check_new_term(&draft).map_err(|e| format!("✗ {e}"))?;
            let term = store.add_term(draft);
            info!("Term added: {}", term.id);
            println!("✓ Added term {} [{}]", term.label(), short_id(&term.id));
            Ok(())
        }
        TermSubcommand::List => {
            list(store);
            Ok(())
        }
        TermSubcommand::Update {
            term,
            name,
            year,
            number,
            clear_number,
        } => {
            let id = resolve_term(store, &term)?;
            if let Some(year) = &year {
                check_year(year).map_err(|e| format!("✗ {e}"))?;
            }
            let patch = TermPatch {
                name,
                year,
                number: if clear_number { Some(None) } else { number.map(Some) },
            };
            store.update_term(&id, patch);
            println!("✓ Updated term [{}]", short_id(&id));
            Ok(())
        }
        TermSubcommand::Delete { term, policy, yes } => {
            let id = resolve_term(store, &term)?;
            let policy = DeletePolicy::from(policy);
            let affected = store.courses_in_term(&id).count();
            if !yes && affected > 0 && policy == DeletePolicy::Cascade {
                let prompt = format!("Delete this term and its {affected} course(s)?");
                if !confirm(&prompt) {
                    println!("✗ Delete cancelled");
                    return Ok(());
                }
            }
            store.delete_term(&id, policy);
            println!("✓ Deleted term [{}] ({policy}, {affected} course(s))", short_id(&id));
            Ok(())
        }
    }
}

fn list(store: &AcademicStore) {
    if store.terms().is_empty() {
        println!("No terms yet.");
        return;
    }
    println!("{:<10} {:<24} {:>7} {:>6} {:>6}", "ID", "TERM", "COURSES", "UVS", "CUM");
    for summary in store.term_summaries() {
        println!(
            "{:<10} {:<24} {:>7} {:>6} {:>6.2}",
            short_id(&summary.term_id),
            summary.label,
            summary.course_count,
            summary.enrolled_uvs,
            summary.cum
        );
        verbose!("           approved UVs: {}", summary.approved_uvs);
    }
}
