//! Term ("ciclo") model

use super::lenient_string;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named academic period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Identifier assigned at creation
    pub id: String,

    /// Term name (e.g., "Ciclo 1")
    pub name: String,

    /// Academic year (e.g., "2025")
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,

    /// Optional ordinal within the year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

impl Term {
    /// Build a term from a draft with the given identifier
    #[must_use]
    pub fn from_draft(id: String, draft: NewTerm) -> Self {
        Self {
            id,
            name: draft.name,
            year: draft.year,
            number: draft.number,
        }
    }

    /// Display label, e.g. "Ciclo 1 / 2025"
    #[must_use]
    pub fn label(&self) -> String {
        if self.year.is_empty() {
            self.name.clone()
        } else {
            format!("{} / {}", self.name, self.year)
        }
    }

    /// Merge the set fields of `patch`
    pub fn apply(&mut self, patch: TermPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(number) = patch.number {
            self.number = number;
        }
    }
}

/// Fields supplied by the caller when adding a term
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTerm {
    /// Term name
    pub name: String,
    /// Academic year
    pub year: String,
    /// Optional ordinal
    pub number: Option<u32>,
}

impl NewTerm {
    /// Convenience constructor without ordinal
    #[must_use]
    pub fn new(name: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year: year.into(),
            number: None,
        }
    }
}

/// Shallow term update; `None` leaves the field untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermPatch {
    /// New name
    pub name: Option<String>,
    /// New year
    pub year: Option<String>,
    /// New ordinal; `Some(None)` clears it
    pub number: Option<Option<u32>>,
}

/// What happens to a term's courses when the term is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete every course of the term, with its activities
    Cascade,
    /// Keep the courses but clear their term reference
    Detach,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "detach" => Ok(Self::Detach),
            _ => Err(format!("Unknown delete policy: '{s}'")),
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cascade => write!(f, "cascade"),
            Self::Detach => write!(f, "detach"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_year_when_present() {
        let term = Term::from_draft("t1".to_string(), NewTerm::new("Ciclo 1", "2025"));
        assert_eq!(term.label(), "Ciclo 1 / 2025");

        let bare = Term::from_draft("t2".to_string(), NewTerm::new("Interciclo", ""));
        assert_eq!(bare.label(), "Interciclo");
    }

    #[test]
    fn numeric_year_is_accepted() {
        let term: Term =
            serde_json::from_str(r#"{"id":"t1","name":"Ciclo 2","year":2024}"#).expect("parse term");
        assert_eq!(term.year, "2024");
        assert!(term.number.is_none());
    }

    #[test]
    fn patch_can_clear_number() {
        let mut term = Term::from_draft(
            "t1".to_string(),
            NewTerm {
                number: Some(1),
                ..NewTerm::new("Ciclo 1", "2025")
            },
        );
        term.apply(TermPatch {
            number: Some(None),
            ..TermPatch::default()
        });
        assert!(term.number.is_none());
        assert_eq!(term.name, "Ciclo 1");
    }

    #[test]
    fn delete_policy_parses() {
        assert_eq!("Cascade".parse::<DeletePolicy>(), Ok(DeletePolicy::Cascade));
        assert_eq!("detach".parse::<DeletePolicy>(), Ok(DeletePolicy::Detach));
        assert!("orphan".parse::<DeletePolicy>().is_err());
    }
}
