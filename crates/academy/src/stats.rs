//! Dashboard figures derived from the stored collections.

use serde::Serialize;

use crate::error::Result;
use crate::model::{AttendanceRecord, Student};
use crate::store::{Backend, Store};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Students on the roster.
    pub total_students: usize,
    /// Students with active status.
    pub active_students: usize,
    /// Hours across every attendance record.
    pub total_hours_logged: f64,
    /// Students with an open session.
    pub on_campus: usize,
}

impl DashboardStats {
    /// Compute the figures from in-memory collections.
    #[must_use]
    pub fn from_records(students: &[Student], records: &[AttendanceRecord]) -> Self {
        Self {
            total_students: students.len(),
            active_students: students.iter().filter(|s| s.is_active()).count(),
            total_hours_logged: records.iter().map(|r| r.hours_worked).sum(),
            on_campus: records.iter().filter(|r| r.is_open()).count(),
        }
    }

    /// Compute the figures from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn collect<B: Backend>(store: &Store<B>) -> Result<Self> {
        let students: Vec<Student> = store.get()?;
        let records: Vec<AttendanceRecord> = store.get()?;
        Ok(Self::from_records(&students, &records))
    }
}
