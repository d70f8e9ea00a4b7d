//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Clock command arguments.
#[derive(Debug, Args)]
pub struct ClockCommand {
    /// Student to clock in or out
    pub student_id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Student roster commands.
#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List every student
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Find students by name or id
    Search {
        /// Part of a first name, last name or id
        #[arg(default_value = "")]
        query: String,

        /// Maximum number of results (defaults to `kiosk.search_limit`)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Enroll a new student
    Enroll(EnrollCommand),
}

/// Enroll command arguments.
#[derive(Debug, Args)]
pub struct EnrollCommand {
    /// Given name
    #[arg(long)]
    pub first_name: String,

    /// Family name
    #[arg(long)]
    pub last_name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Program name, e.g. "Esthetician"
    #[arg(long)]
    pub program: String,

    /// Phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: Option<String>,
}

/// Attendance listing arguments.
#[derive(Debug, Args)]
pub struct AttendanceCommand {
    /// Only show this student's sessions
    #[arg(short, long)]
    pub student: Option<String>,

    /// Only show open sessions
    #[arg(long)]
    pub open: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Grade listing arguments.
#[derive(Debug, Args)]
pub struct GradesCommand {
    /// Only show this student's grades
    #[arg(short, long)]
    pub student: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_clock_command_debug() {
        let cmd = ClockCommand {
            student_id: "student-1".to_string(),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("student-1"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
