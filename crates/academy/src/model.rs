//! Record types persisted by the store.
//!
//! Field names serialize in camelCase so payloads stay readable by the
//! kiosk front end that shares the same keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Training program a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    /// Skin care.
    #[serde(rename = "Esthetician")]
    Esthetician,
    /// Advanced techniques and medical esthetics.
    #[serde(rename = "Advanced Esthetician")]
    AdvancedEsthetician,
    /// Nail technology.
    #[serde(rename = "Manicurist")]
    Manicurist,
    /// Eyelash extensions.
    #[serde(rename = "Eyelash Technician")]
    EyelashTechnician,
    /// Dual certification.
    #[serde(rename = "Esthetician + Manicurist")]
    EstheticianManicurist,
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Esthetician => write!(f, "Esthetician"),
            Self::AdvancedEsthetician => write!(f, "Advanced Esthetician"),
            Self::Manicurist => write!(f, "Manicurist"),
            Self::EyelashTechnician => write!(f, "Eyelash Technician"),
            Self::EstheticianManicurist => write!(f, "Esthetician + Manicurist"),
        }
    }
}

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    /// Currently attending.
    #[default]
    Active,
    /// Finished the program.
    Graduated,
    /// Temporarily barred from attending.
    Suspended,
    /// Left the program.
    Withdrawn,
}

/// Where an attendance session took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    /// Main building.
    #[default]
    #[serde(rename = "main-campus")]
    MainCampus,
    /// First lab.
    #[serde(rename = "lab-1")]
    Lab1,
    /// Second lab.
    #[serde(rename = "lab-2")]
    Lab2,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainCampus => write!(f, "main-campus"),
            Self::Lab1 => write!(f, "lab-1"),
            Self::Lab2 => write!(f, "lab-2"),
        }
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State code.
    pub state: String,
    /// ZIP code.
    pub zip_code: String,
}

/// Person to call in an emergency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Contact name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Relationship to the student.
    pub relationship: String,
}

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Opaque identifier.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Date of birth, if it was supplied.
    #[serde(default)]
    pub date_of_birth: Option<DateTime<Utc>>,
    /// Home address.
    pub address: Address,
    /// Emergency contact.
    pub emergency_contact: EmergencyContact,
    /// When the student enrolled.
    pub enrollment_date: DateTime<Utc>,
    /// Program enrolled in.
    pub program: Program,
    /// Enrollment status.
    pub status: StudentStatus,
    /// Hours the program requires. Fixed at enrollment.
    pub total_hours_required: f64,
    /// Hours accrued so far. Only clock-out increases it.
    pub hours_completed: f64,
    /// Grade point average.
    pub gpa: f64,
    /// Tuition paid to date.
    pub tuition_paid: f64,
    /// Total tuition owed.
    pub tuition_total: f64,
    /// Optional profile picture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl Student {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Hours still needed to finish the program, never negative.
    #[must_use]
    pub fn hours_remaining(&self) -> f64 {
        (self.total_hours_required - self.hours_completed).max(0.0)
    }

    /// Whether the student is currently attending.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}

/// One clock-in/clock-out session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Opaque identifier.
    pub id: String,
    /// Student this session belongs to.
    pub student_id: String,
    /// When the session started.
    pub clock_in: DateTime<Utc>,
    /// When the session ended. Absent while open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<DateTime<Utc>>,
    /// Hours credited, rounded to two decimals. Zero while open.
    pub hours_worked: f64,
    /// Where the session took place.
    pub location: Location,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Whether the session counts toward hours.
    pub approved: bool,
}

impl AttendanceRecord {
    /// Whether the session has not been clocked out yet.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// Kind of assessment a grade was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    /// Hands-on assessment.
    Practical,
    /// Written exam.
    Written,
    /// Final exam.
    Final,
}

/// A graded assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    /// Opaque identifier.
    pub id: String,
    /// Student who was graded.
    pub student_id: String,
    /// Subject area.
    pub subject: String,
    /// Kind of assessment.
    pub assessment_type: AssessmentType,
    /// Name of the assessment.
    pub assessment_name: String,
    /// Points earned.
    pub score: f64,
    /// Points possible.
    pub max_score: f64,
    /// When the grade was recorded.
    pub date_graded: DateTime<Utc>,
    /// Grading instructor.
    pub instructor: String,
    /// Instructor comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Grade {
    /// Score as a percentage of the maximum, or `None` when the maximum is zero.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        (self.max_score > 0.0).then(|| self.score / self.max_score * 100.0)
    }
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Staff with full access.
    Admin,
    /// Student account.
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
