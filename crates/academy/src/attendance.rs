//! Clock-in/clock-out state machine.
//!
//! A student is on campus exactly when they have an open attendance record.
//! [`AttendanceEngine::toggle_clock`] opens a record for a student who has
//! none and closes the open one otherwise, crediting the rounded elapsed
//! hours to the student. A closed record is never reopened.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::model::{AttendanceRecord, Location, Student};
use crate::store::{next_id, Backend, Store};

/// Prefix of generated attendance record ids.
const RECORD_ID_PREFIX: &str = "attendance";

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Result of a clock toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClockOutcome {
    /// A new session was opened.
    ClockedIn {
        /// The student.
        student_id: String,
        /// When the session started.
        clock_in: DateTime<Utc>,
    },
    /// The open session was closed.
    ClockedOut {
        /// The student.
        student_id: String,
        /// When the session ended.
        clock_out: DateTime<Utc>,
        /// Hours credited for the session.
        hours_worked: f64,
    },
    /// No student has the given id. Nothing was written.
    UnknownStudent {
        /// The id that was looked up.
        student_id: String,
    },
}

impl std::fmt::Display for ClockOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClockedIn {
                student_id,
                clock_in,
            } => write!(
                f,
                "{student_id} clocked in at {}",
                clock_in.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::ClockedOut {
                student_id,
                hours_worked,
                ..
            } => write!(f, "{student_id} clocked out. Session: {hours_worked:.2} hours"),
            Self::UnknownStudent { student_id } => write!(f, "unknown student: {student_id}"),
        }
    }
}

/// Hours between two instants, rounded to two decimals.
///
/// A clock-out at or before the clock-in yields `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hours_between(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> f64 {
    let millis = (clock_out - clock_in).num_milliseconds();
    if millis <= 0 {
        if millis < 0 {
            warn!(
                "Clock-out {} precedes clock-in {}, crediting 0 hours",
                clock_out, clock_in
            );
        }
        return 0.0;
    }
    round_hours(millis as f64 / MILLIS_PER_HOUR)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Drives clock toggles against a [`Store`].
#[derive(Debug)]
pub struct AttendanceEngine<'a, B, C> {
    store: &'a Store<B>,
    clock: C,
    location: Location,
}

impl<'a, B: Backend, C: Clock> AttendanceEngine<'a, B, C> {
    /// Create an engine stamping new records with the main campus location.
    #[must_use]
    pub fn new(store: &'a Store<B>, clock: C) -> Self {
        Self {
            store,
            clock,
            location: Location::MainCampus,
        }
    }

    /// Stamp new records with `location` instead.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Clock the student in if they are out, or out if they are in.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or
    /// [`Error::MultipleOpenSessions`] if the student already has more than
    /// one open record. Nothing is written in either case.
    pub fn toggle_clock(&self, student_id: &str) -> Result<ClockOutcome> {
        // Unknown ids must not cause the first-read seeding to be persisted
        let known: Vec<Student> = self.store.peek()?;
        if !known.iter().any(|s| s.id == student_id) {
            debug!("Clock toggle for unknown student {}", student_id);
            return Ok(ClockOutcome::UnknownStudent {
                student_id: student_id.to_string(),
            });
        }

        let mut records: Vec<AttendanceRecord> = self.store.get()?;
        let mut students: Vec<Student> = self.store.get()?;
        let Some(student_idx) = students.iter().position(|s| s.id == student_id) else {
            return Ok(ClockOutcome::UnknownStudent {
                student_id: student_id.to_string(),
            });
        };

        let now = self.clock.now();
        let Some(record_idx) = find_open(&records, student_id)? else {
            let record = AttendanceRecord {
                id: next_id(RECORD_ID_PREFIX, now, &records),
                student_id: student_id.to_string(),
                clock_in: now,
                clock_out: None,
                hours_worked: 0.0,
                location: self.location,
                notes: None,
                approved: true,
            };
            records.push(record);
            self.store.save(&records)?;

            info!("{} clocked in", student_id);
            return Ok(ClockOutcome::ClockedIn {
                student_id: student_id.to_string(),
                clock_in: now,
            });
        };

        let record = &mut records[record_idx];
        let hours_worked = hours_between(record.clock_in, now);
        record.clock_out = Some(now);
        record.hours_worked = hours_worked;

        students[student_idx].hours_completed += hours_worked;
        self.store.close_session(&records, &students)?;

        info!("{} clocked out after {:.2} hours", student_id, hours_worked);
        Ok(ClockOutcome::ClockedOut {
            student_id: student_id.to_string(),
            clock_out: now,
            hours_worked,
        })
    }

    /// Whether the student currently has an open session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the student has several open sessions.
    pub fn is_clocked_in(&self, student_id: &str) -> Result<bool> {
        Ok(self.open_session(student_id)?.is_some())
    }

    /// The student's open session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the student has several open sessions.
    pub fn open_session(&self, student_id: &str) -> Result<Option<AttendanceRecord>> {
        let records: Vec<AttendanceRecord> = self.store.get()?;
        Ok(find_open(&records, student_id)?.map(|idx| records[idx].clone()))
    }

    /// All of the student's sessions, oldest clock-in first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn history(&self, student_id: &str) -> Result<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = self.store.get()?;
        records.retain(|r| r.student_id == student_id);
        records.sort_by_key(|r| r.clock_in);
        Ok(records)
    }
}

/// Index of the student's open record.
///
/// More than one open record is a corrupted state and is reported rather
/// than resolved.
fn find_open(records: &[AttendanceRecord], student_id: &str) -> Result<Option<usize>> {
    let open: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.student_id == student_id && r.is_open())
        .map(|(idx, _)| idx)
        .collect();

    match open.as_slice() {
        [] => Ok(None),
        [idx] => Ok(Some(*idx)),
        _ => Err(Error::MultipleOpenSessions {
            student_id: student_id.to_string(),
            count: open.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::logging::init_test_logging;
    use crate::model::{Address, EmergencyContact, Program, StudentStatus};
    use crate::store::{Collection, MemoryBackend, UnavailableBackend};
    use chrono::{Duration, TimeZone};

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 4, 9, 0, 0).unwrap()
    }

    fn student(id: &str) -> Student {
        Student {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            email: format!("{id}@example.com"),
            phone: String::new(),
            date_of_birth: None,
            address: Address::default(),
            emergency_contact: EmergencyContact::default(),
            enrollment_date: nine_am(),
            program: Program::Manicurist,
            status: StudentStatus::Active,
            total_hours_required: 600.0,
            hours_completed: 0.0,
            gpa: 0.0,
            tuition_paid: 0.0,
            tuition_total: 6150.0,
            profile_image: None,
        }
    }

    fn store_with(ids: &[&str]) -> Store<MemoryBackend> {
        init_test_logging();
        let store = Store::new(MemoryBackend::new());
        let students: Vec<Student> = ids.iter().map(|id| student(id)).collect();
        store.save(&students).unwrap();
        store
    }

    fn records(store: &Store<MemoryBackend>) -> Vec<AttendanceRecord> {
        store.get().unwrap()
    }

    fn hours_completed(store: &Store<MemoryBackend>, id: &str) -> f64 {
        let students: Vec<Student> = store.get().unwrap();
        students
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
            .hours_completed
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_hours_between_half_hour() {
        let start = nine_am();
        assert_close(hours_between(start, start + Duration::minutes(30)), 0.5);
    }

    #[test]
    fn test_hours_between_rounds_to_two_decimals() {
        let start = nine_am();
        // 20 minutes = 0.3333... hours
        assert_close(hours_between(start, start + Duration::minutes(20)), 0.33);
        // 50 minutes = 0.8333... hours
        assert_close(hours_between(start, start + Duration::minutes(50)), 0.83);
    }

    #[test]
    fn test_hours_between_same_instant_is_zero() {
        let start = nine_am();
        assert_close(hours_between(start, start), 0.0);
    }

    #[test]
    fn test_hours_between_negative_is_clamped() {
        init_test_logging();
        let start = nine_am();
        assert_close(hours_between(start, start - Duration::hours(1)), 0.0);
    }

    #[test]
    fn test_clock_in_then_out_half_hour() {
        let store = store_with(&["student-1"]);
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        let outcome = engine.toggle_clock("student-1").unwrap();
        assert_eq!(
            outcome,
            ClockOutcome::ClockedIn {
                student_id: "student-1".to_string(),
                clock_in: nine_am(),
            }
        );
        let open = records(&store);
        assert_eq!(open.len(), 1);
        assert!(open[0].is_open());
        assert_eq!(open[0].location, Location::MainCampus);
        assert!(open[0].approved);
        assert_close(open[0].hours_worked, 0.0);

        clock.advance(Duration::minutes(30));
        let outcome = engine.toggle_clock("student-1").unwrap();
        match outcome {
            ClockOutcome::ClockedOut {
                ref student_id,
                hours_worked,
                clock_out,
            } => {
                assert_eq!(student_id, "student-1");
                assert_close(hours_worked, 0.5);
                assert_eq!(clock_out, nine_am() + Duration::minutes(30));
            }
            other => panic!("expected ClockedOut, got {other:?}"),
        }

        let closed = records(&store);
        assert_eq!(closed.len(), 1);
        assert!(!closed[0].is_open());
        assert_close(closed[0].hours_worked, 0.5);
        assert_close(hours_completed(&store, "student-1"), 0.5);
    }

    #[test]
    fn test_unknown_student_writes_nothing() {
        let store = store_with(&["student-1"]);
        // Touch attendance so its seeded state is stored before the snapshot
        let _ = records(&store);
        let before_records = store
            .backend()
            .read(Collection::Attendance.key())
            .unwrap();
        let before_students = store.backend().read(Collection::Students.key()).unwrap();

        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));
        let outcome = engine.toggle_clock("nonexistent-id").unwrap();

        assert_eq!(
            outcome,
            ClockOutcome::UnknownStudent {
                student_id: "nonexistent-id".to_string()
            }
        );
        assert_eq!(
            store.backend().read(Collection::Attendance.key()).unwrap(),
            before_records
        );
        assert_eq!(
            store.backend().read(Collection::Students.key()).unwrap(),
            before_students
        );
    }

    #[test]
    fn test_unknown_student_on_fresh_store_leaves_it_empty() {
        let store = Store::new(MemoryBackend::new());
        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));

        let outcome = engine.toggle_clock("nonexistent-id").unwrap();

        assert!(matches!(outcome, ClockOutcome::UnknownStudent { .. }));
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_seeded_student_clocks_in_on_fresh_store() {
        let store = Store::new(MemoryBackend::new());
        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));

        let outcome = engine.toggle_clock("student-1").unwrap();

        assert!(matches!(outcome, ClockOutcome::ClockedIn { .. }));
        assert_eq!(records(&store).len(), 1);
        assert_close(hours_completed(&store, "student-1"), 320.0);
    }

    #[test]
    fn test_toggle_twice_returns_to_clocked_out() {
        let store = store_with(&["student-1"]);
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        assert!(!engine.is_clocked_in("student-1").unwrap());
        engine.toggle_clock("student-1").unwrap();
        assert!(engine.is_clocked_in("student-1").unwrap());
        clock.advance(Duration::hours(2));
        engine.toggle_clock("student-1").unwrap();
        assert!(!engine.is_clocked_in("student-1").unwrap());

        let history = engine.history("student-1").unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_open());
    }

    #[test]
    fn test_hours_invariant_over_many_sessions() {
        let store = store_with(&["student-1", "student-2"]);
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        let sessions = [
            ("student-1", 45),
            ("student-2", 90),
            ("student-1", 20),
            ("student-2", 7),
            ("student-1", 240),
        ];
        for (id, minutes) in sessions {
            engine.toggle_clock(id).unwrap();
            clock.advance(Duration::minutes(minutes));
            engine.toggle_clock(id).unwrap();
            clock.advance(Duration::minutes(5));
        }

        for id in ["student-1", "student-2"] {
            let sum: f64 = records(&store)
                .iter()
                .filter(|r| r.student_id == id && !r.is_open())
                .map(|r| r.hours_worked)
                .sum();
            assert_close(hours_completed(&store, id), sum);
        }
    }

    #[test]
    fn test_at_most_one_open_record_per_student() {
        let store = store_with(&["student-1", "student-2"]);
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        for _ in 0..5 {
            for id in ["student-1", "student-2"] {
                engine.toggle_clock(id).unwrap();
                let open = records(&store)
                    .iter()
                    .filter(|r| r.student_id == id && r.is_open())
                    .count();
                assert!(open <= 1);
            }
            clock.advance(Duration::minutes(15));
        }
    }

    #[test]
    fn test_students_are_independent() {
        let store = store_with(&["student-1", "student-2"]);
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        engine.toggle_clock("student-1").unwrap();
        engine.toggle_clock("student-2").unwrap();
        clock.advance(Duration::hours(1));
        engine.toggle_clock("student-1").unwrap();

        assert!(!engine.is_clocked_in("student-1").unwrap());
        assert!(engine.is_clocked_in("student-2").unwrap());
        assert_close(hours_completed(&store, "student-1"), 1.0);
        assert_close(hours_completed(&store, "student-2"), 0.0);
    }

    #[test]
    fn test_same_instant_clock_ins_get_distinct_ids() {
        let store = store_with(&["student-1", "student-2"]);
        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));

        engine.toggle_clock("student-1").unwrap();
        engine.toggle_clock("student-2").unwrap();

        let all = records(&store);
        assert_eq!(all.len(), 2);
        assert_ne!(all[0].id, all[1].id);
    }

    #[test]
    fn test_clock_out_with_backwards_clock_credits_zero() {
        let store = store_with(&["student-1"]);
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        engine.toggle_clock("student-1").unwrap();
        clock.advance(Duration::minutes(-10));
        let outcome = engine.toggle_clock("student-1").unwrap();

        assert!(matches!(
            outcome,
            ClockOutcome::ClockedOut { hours_worked, .. } if hours_worked == 0.0
        ));
        assert_close(hours_completed(&store, "student-1"), 0.0);
        assert!(!engine.is_clocked_in("student-1").unwrap());
    }

    #[test]
    fn test_multiple_open_sessions_is_an_error() {
        let store = store_with(&["student-1"]);
        let open = |id: &str| AttendanceRecord {
            id: id.to_string(),
            student_id: "student-1".to_string(),
            clock_in: nine_am(),
            clock_out: None,
            hours_worked: 0.0,
            location: Location::MainCampus,
            notes: None,
            approved: true,
        };
        store.save(&[open("a-1"), open("a-2")]).unwrap();

        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));
        let err = engine.toggle_clock("student-1").unwrap_err();
        assert!(matches!(
            err,
            Error::MultipleOpenSessions { count: 2, .. }
        ));
        assert!(engine.is_clocked_in("student-1").is_err());

        // Nothing was closed
        assert!(records(&store).iter().all(AttendanceRecord::is_open));
        assert_close(hours_completed(&store, "student-1"), 0.0);
    }

    #[test]
    fn test_with_location() {
        let store = store_with(&["student-1"]);
        let engine =
            AttendanceEngine::new(&store, ManualClock::new(nine_am())).with_location(Location::Lab2);
        engine.toggle_clock("student-1").unwrap();
        assert_eq!(records(&store)[0].location, Location::Lab2);
    }

    #[test]
    fn test_open_session_returns_record() {
        let store = store_with(&["student-1"]);
        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));

        assert!(engine.open_session("student-1").unwrap().is_none());
        engine.toggle_clock("student-1").unwrap();
        let open = engine.open_session("student-1").unwrap().unwrap();
        assert_eq!(open.clock_in, nine_am());
    }

    #[test]
    fn test_seeded_student_accrues_on_top_of_existing_hours() {
        let store = Store::new(MemoryBackend::new());
        let clock = ManualClock::new(nine_am());
        let engine = AttendanceEngine::new(&store, &clock);

        engine.toggle_clock("student-1").unwrap();
        clock.advance(Duration::minutes(90));
        engine.toggle_clock("student-1").unwrap();

        assert_close(hours_completed(&store, "student-1"), 321.5);
    }

    #[test]
    fn test_unavailable_store_reports_unknown_student() {
        let store = Store::new(UnavailableBackend);
        let engine = AttendanceEngine::new(&store, ManualClock::new(nine_am()));
        let outcome = engine.toggle_clock("student-1").unwrap();
        assert!(matches!(outcome, ClockOutcome::UnknownStudent { .. }));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ClockOutcome::ClockedOut {
            student_id: "student-1".to_string(),
            clock_out: nine_am(),
            hours_worked: 0.5,
        };
        assert_eq!(
            outcome.to_string(),
            "student-1 clocked out. Session: 0.50 hours"
        );
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = ClockOutcome::UnknownStudent {
            student_id: "x".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"outcome\":\"unknown_student\""));
    }
}
