//! Command-line interface for academy.
//!
//! This module provides the CLI structure for the `academy` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AttendanceCommand, ClockCommand, ConfigCommand, EnrollCommand, GradesCommand, LoginCommand,
    OutputFormat, StatusCommand, StudentsCommand,
};

/// academy - attendance kiosk and student records
///
/// Clock students in and out, enroll new students and review hours and
/// grades from the local academy database.
#[derive(Debug, Parser)]
#[command(name = "academy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clock a student in, or out if already clocked in
    Clock(ClockCommand),

    /// Show dashboard figures
    Status(StatusCommand),

    /// Manage the student roster
    #[command(subcommand)]
    Students(StudentsCommand),

    /// List attendance sessions
    Attendance(AttendanceCommand),

    /// List grades
    Grades(GradesCommand),

    /// List the program catalog
    Programs,

    /// Sign in
    Login(LoginCommand),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
