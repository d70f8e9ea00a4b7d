//! Kiosk student lookup.

use serde::Serialize;

use crate::error::Result;
use crate::model::{AttendanceRecord, Student};
use crate::store::{Backend, Store};

/// A search hit with the student's current clock state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KioskEntry {
    /// The matching student.
    pub student: Student,
    /// Whether they have an open session.
    pub clocked_in: bool,
}

/// Students whose first name, last name or id contains `query`, ignoring case.
///
/// An empty query matches everyone. At most `limit` entries are returned,
/// in roster order.
#[must_use]
pub fn search(
    students: &[Student],
    records: &[AttendanceRecord],
    query: &str,
    limit: usize,
) -> Vec<KioskEntry> {
    let needle = query.trim().to_lowercase();
    students
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.first_name.to_lowercase().contains(&needle)
                || s.last_name.to_lowercase().contains(&needle)
                || s.id.to_lowercase().contains(&needle)
        })
        .take(limit)
        .map(|s| KioskEntry {
            student: s.clone(),
            clocked_in: records.iter().any(|r| r.student_id == s.id && r.is_open()),
        })
        .collect()
}

/// [`search`] over the stored roster.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn search_store<B: Backend>(
    store: &Store<B>,
    query: &str,
    limit: usize,
) -> Result<Vec<KioskEntry>> {
    let students: Vec<Student> = store.get()?;
    let records: Vec<AttendanceRecord> = store.get()?;
    Ok(search(&students, &records, query, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::AttendanceEngine;
    use crate::clock::ManualClock;
    use crate::store::MemoryBackend;
    use chrono::Utc;

    fn store() -> Store<MemoryBackend> {
        Store::new(MemoryBackend::new())
    }

    #[test]
    fn test_empty_query_lists_everyone() {
        let hits = search_store(&store(), "", 6).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let hits = search_store(&store(), "MARIA", 6).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].student.id, "student-1");

        let hits = search_store(&store(), "johnson", 6).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].student.id, "student-2");
    }

    #[test]
    fn test_match_by_id() {
        let hits = search_store(&store(), "student-", 6).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_no_match() {
        assert!(search_store(&store(), "zzz", 6).unwrap().is_empty());
    }

    #[test]
    fn test_limit() {
        assert_eq!(search_store(&store(), "", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_reports_clock_state() {
        let store = store();
        AttendanceEngine::new(&store, ManualClock::new(Utc::now()))
            .toggle_clock("student-2")
            .unwrap();

        let hits = search_store(&store, "", 6).unwrap();
        let by_id = |id: &str| hits.iter().find(|h| h.student.id == id).unwrap();
        assert!(!by_id("student-1").clocked_in);
        assert!(by_id("student-2").clocked_in);
    }
}
