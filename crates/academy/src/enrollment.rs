//! Student enrollment.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::model::{Address, EmergencyContact, Program, Student, StudentStatus};
use crate::store::{next_id, Backend, Store};

/// Prefix of generated student ids.
const STUDENT_ID_PREFIX: &str = "student";

/// Details collected when a student enrolls.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    /// Given name. Required.
    pub first_name: String,
    /// Family name. Required.
    pub last_name: String,
    /// Email address. Required.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Date of birth.
    pub date_of_birth: Option<DateTime<Utc>>,
    /// Home address.
    pub address: Address,
    /// Emergency contact.
    pub emergency_contact: EmergencyContact,
    /// Program to enroll in.
    pub program: Program,
}

impl NewStudent {
    /// Check that the required fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] naming the first empty required field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }
        Ok(())
    }
}

/// Add a student to the roster.
///
/// Required hours and tuition come from the program catalog. The student
/// starts active with no hours, no GPA and nothing paid.
///
/// # Errors
///
/// Returns an error if a required field is empty or the store fails.
pub fn enroll<B: Backend, C: Clock>(
    store: &Store<B>,
    clock: &C,
    new: NewStudent,
) -> Result<Student> {
    new.validate()?;

    let mut students: Vec<Student> = store.get()?;
    let now = clock.now();
    let info = new.program.info();

    let student = Student {
        id: next_id(STUDENT_ID_PREFIX, now, &students),
        first_name: new.first_name.trim().to_string(),
        last_name: new.last_name.trim().to_string(),
        email: new.email.trim().to_string(),
        phone: new.phone,
        date_of_birth: new.date_of_birth,
        address: new.address,
        emergency_contact: new.emergency_contact,
        enrollment_date: now,
        program: new.program,
        status: StudentStatus::Active,
        total_hours_required: info.hours,
        hours_completed: 0.0,
        gpa: 0.0,
        tuition_paid: 0.0,
        tuition_total: info.price,
        profile_image: None,
    };

    students.push(student.clone());
    store.save(&students)?;

    info!(
        "Enrolled {} ({}) in {}",
        student.full_name(),
        student.id,
        student.program
    );
    Ok(student)
}
