//! CLI argument definitions for `cumtracker`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cum_tracker::config::ConfigOverrides;
use cum_tracker::core::models::{CourseResult, DeletePolicy};
use cum_tracker::core::report::ReportFormat;
use cum_tracker::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// What to do with a term's courses when the term is deleted
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum PolicyArg {
    /// Delete the courses too
    Cascade,
    /// Keep the courses without a term
    Detach,
}

impl From<PolicyArg> for DeletePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Cascade => Self::Cascade,
            PolicyArg::Detach => Self::Detach,
        }
    }
}

/// Course result accepted by `course update --result`
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ResultArg {
    /// No grade yet
    Pending,
    /// Passed
    Approved,
    /// Not passed
    Failed,
    /// Dropped
    Withdrawn,
}

impl From<ResultArg> for CourseResult {
    fn from(arg: ResultArg) -> Self {
        match arg {
            ResultArg::Pending => Self::Pending,
            ResultArg::Approved => Self::Approved,
            ResultArg::Failed => Self::Failed,
            ResultArg::Withdrawn => Self::Withdrawn,
        }
    }
}

/// Report format argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Markdown tables
    #[value(alias = "md")]
    Markdown,
    /// Self-contained HTML page
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => Self::Markdown,
            FormatArg::Html => Self::Html,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`, `base_amount`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum TermSubcommand {
    /// Add a term.
    Add {
        /// Term name, e.g. "Ciclo 1"
        #[arg(value_name = "NAME")]
        name: String,
        /// Academic year
        #[arg(value_name = "YEAR")]
        year: String,
        /// Optional ordinal within the year
        #[arg(long)]
        number: Option<u32>,
    },
    /// List terms with their CUM.
    List,
    /// Update a term's fields.
    Update {
        /// Term id or unique id prefix
        #[arg(value_name = "TERM")]
        term: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New year
        #[arg(long)]
        year: Option<String>,
        /// New ordinal
        #[arg(long, conflicts_with = "clear_number")]
        number: Option<u32>,
        /// Remove the ordinal
        #[arg(long)]
        clear_number: bool,
    },
    /// Delete a term.
    Delete {
        /// Term id or unique id prefix
        #[arg(value_name = "TERM")]
        term: String,
        /// What happens to the term's courses
        #[arg(long, value_enum, default_value = "cascade")]
        policy: PolicyArg,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseSubcommand {
    /// Add a course, optionally inside a new term.
    Add {
        /// Course code, e.g. MAT115
        #[arg(value_name = "CODE")]
        code: String,
        /// Course name
        #[arg(value_name = "NAME")]
        name: String,
        /// Credit units
        #[arg(long)]
        uvs: u32,
        /// Attempt number (1-4)
        #[arg(long, default_value = "1")]
        enrollment: String,
        /// Existing term id or unique id prefix
        #[arg(long, conflicts_with = "new_term")]
        term: Option<String>,
        /// Create a new term with this name and put the course in it
        #[arg(long, value_name = "NAME", requires = "year")]
        new_term: Option<String>,
        /// Year of the new term
        #[arg(long, requires = "new_term")]
        year: Option<String>,
        /// Register the course as already withdrawn
        #[arg(long)]
        withdrawn: bool,
    },
    /// List courses.
    List {
        /// Only courses in this term
        #[arg(long)]
        term: Option<String>,
    },
    /// Show a course with its activities.
    Show {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Update a course's fields. Grade and result are stored as given.
    Update {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
        /// New code
        #[arg(long)]
        code: Option<String>,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New attempt number
        #[arg(long)]
        enrollment: Option<String>,
        /// New credit units
        #[arg(long)]
        uvs: Option<u32>,
        /// Move to this term
        #[arg(long, conflicts_with = "detach")]
        term: Option<String>,
        /// Remove from its term
        #[arg(long)]
        detach: bool,
        /// Final grade to store
        #[arg(long)]
        grade: Option<f64>,
        /// Result to store
        #[arg(long, value_enum)]
        result: Option<ResultArg>,
    },
    /// Mark a course as withdrawn.
    Withdraw {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Clear the withdrawn status and re-derive the result.
    Reinstate {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
    },
    /// Delete a course and its activities.
    Delete {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ActivitySubcommand {
    /// Add a graded activity to a course.
    Add {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
        /// Activity name
        #[arg(value_name = "NAME")]
        name: String,
        /// Weight in percent (0-100]
        #[arg(short, long)]
        percentage: f64,
        /// Score out of 10
        #[arg(short, long)]
        grade: f64,
        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update an activity.
    Update {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
        /// Activity id, unique id prefix or unique name
        #[arg(value_name = "ACTIVITY")]
        activity: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New weight
        #[arg(short, long)]
        percentage: Option<f64>,
        /// New score
        #[arg(short, long)]
        grade: Option<f64>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete an activity.
    Delete {
        /// Course id, unique id prefix or unique code
        #[arg(value_name = "COURSE")]
        course: String,
        /// Activity id, unique id prefix or unique name
        #[arg(value_name = "ACTIVITY")]
        activity: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Manage terms.
    Term {
        #[command(subcommand)]
        subcommand: TermSubcommand,
    },
    /// Manage courses.
    Course {
        #[command(subcommand)]
        subcommand: CourseSubcommand,
    },
    /// Manage a course's graded activities.
    Activity {
        #[command(subcommand)]
        subcommand: ActivitySubcommand,
    },
    /// Show dashboard statistics.
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate the scholarship recontribution for the current CUM.
    Scholarship {
        /// Use this CUM instead of the recorded one
        #[arg(long)]
        cum: Option<f64>,
    },
    /// Render a dashboard report.
    Report {
        /// Report format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: FormatArg,
        /// Output file (defaults to the configured reports directory)
        #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Export every record to a JSON snapshot.
    Export {
        /// Output file (defaults to a dated file in the exports directory)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Replace every record with a JSON snapshot.
    Import {
        /// Snapshot file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every course and term.
    Wipe {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "cumtracker",
    about = "Track courses, grades and CUM from the command line",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Use this record directory instead of the configured one
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the scholarship base amount
    #[arg(long = "base-amount", value_name = "AMOUNT")]
    pub base_amount: Option<f64>,

    /// Override the exports directory
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Override the reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override; the config file is never modified.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().to_string());
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path(&self.config_log_file),
            verbose: self.config_verbose,
            data_dir: path(&self.data_dir),
            base_amount: self.base_amount,
            exports_dir: path(&self.exports_dir),
            reports_dir: path(&self.reports_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let cli = Cli::parse_from(["cumtracker", "stats"]);
        let overrides = cli.to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.data_dir.is_none());
        assert!(overrides.base_amount.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = Cli::parse_from([
            "cumtracker",
            "--config-level",
            "debug",
            "--config-verbose",
            "yes",
            "--data-dir",
            "/tmp/records",
            "--base-amount",
            "5000",
            "stats",
        ]);
        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.data_dir, Some("/tmp/records".to_string()));
        assert_eq!(overrides.base_amount, Some(5000.0));
    }

    #[test]
    fn test_course_add_in_new_term_requires_year() {
        assert!(Cli::try_parse_from([
            "cumtracker", "course", "add", "MAT115", "Matemática I", "--uvs", "4", "--new-term", "Ciclo 1",
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "cumtracker", "course", "add", "MAT115", "Matemática I", "--uvs", "4", "--new-term", "Ciclo 1",
            "--year", "2025",
        ])
        .expect("valid");
        assert!(matches!(
            cli.command,
            Command::Course {
                subcommand: CourseSubcommand::Add { new_term: Some(_), year: Some(_), .. }
            }
        ));
    }

    #[test]
    fn test_term_delete_defaults_to_cascade() {
        let cli = Cli::parse_from(["cumtracker", "term", "delete", "abc"]);
        let Command::Term {
            subcommand: TermSubcommand::Delete { policy, yes, .. },
        } = cli.command
        else {
            panic!("expected term delete");
        };
        assert_eq!(DeletePolicy::from(policy), DeletePolicy::Cascade);
        assert!(!yes);
    }

    #[test]
    fn test_report_format_alias() {
        let cli = Cli::parse_from(["cumtracker", "report", "-f", "md", "--stdout"]);
        assert!(matches!(
            cli.command,
            Command::Report { format: FormatArg::Markdown, stdout: true, .. }
        ));
    }
}
