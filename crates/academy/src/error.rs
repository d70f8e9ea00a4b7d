//! Error types for academy.
//!
//! This module defines all error types used throughout the academy crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for academy operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A stored collection could not be decoded.
    #[error("failed to decode collection '{key}': {source}")]
    Decode {
        /// Storage key of the collection.
        key: &'static str,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored payload was written by a newer schema than this build understands.
    #[error("collection '{key}' has schema version {found}, newest supported is {supported}")]
    SchemaVersion {
        /// Storage key of the collection.
        key: &'static str,
        /// Version found in the payload.
        found: u32,
        /// Newest version this build can read.
        supported: u32,
    },

    // === Attendance Errors ===
    /// More than one open attendance session exists for a student.
    #[error("student '{student_id}' has {count} open attendance sessions")]
    MultipleOpenSessions {
        /// The affected student.
        student_id: String,
        /// Number of open sessions found.
        count: usize,
    },

    // === Enrollment / Auth Errors ===
    /// A required field was left empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// The requested program is not in the catalog.
    #[error("unknown program: {0}")]
    UnknownProgram(String),

    /// No user is registered with the given email.
    #[error("user not found: {email}")]
    UserNotFound {
        /// Email that was looked up.
        email: String,
    },

    /// The supplied password did not match.
    #[error("invalid password")]
    InvalidPassword,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for academy operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create a migration error.
    #[must_use]
    pub fn migration(message: impl Into<String>) -> Self {
        Self::DatabaseMigration {
            message: message.into(),
        }
    }

    /// Check if this error means persisted data is in an unexpected shape.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::SchemaVersion { .. } | Self::MultipleOpenSessions { .. }
        )
    }

    /// Check if this error is a login failure.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::UserNotFound { .. } | Self::InvalidPassword)
    }

    /// Process exit status reported by the CLI for this error.
    ///
    /// Login failures exit with 2 and stored-data problems with 3; anything
    /// else exits with 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_auth_error() {
            2
        } else if self.is_data_error() {
            3
        } else {
            1
        }
    }
}
