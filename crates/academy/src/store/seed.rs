//! Demo data written on the first read of an empty collection.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    Address, AssessmentType, EmergencyContact, Grade, Program, Role, Student, StudentStatus, User,
};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    // Every literal below is a valid calendar date
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// One administrator and one student account.
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        User {
            id: "admin-1".to_string(),
            email: "admin@distinctiveacademy.com".to_string(),
            name: "Distinctive Academy Admin".to_string(),
            role: Role::Admin,
            created_at: date(2024, 1, 1),
        },
        User {
            id: "student-1".to_string(),
            email: "maria.gonzalez@email.com".to_string(),
            name: "Maria Gonzalez".to_string(),
            role: Role::Student,
            created_at: date(2024, 2, 15),
        },
    ]
}

/// Two active students part-way through their programs.
#[must_use]
pub fn students() -> Vec<Student> {
    vec![
        Student {
            id: "student-1".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Gonzalez".to_string(),
            email: "maria.gonzalez@email.com".to_string(),
            phone: "(713) 555-0123".to_string(),
            date_of_birth: Some(date(1995, 3, 15)),
            address: Address {
                street: "123 Houston St".to_string(),
                city: "Houston".to_string(),
                state: "TX".to_string(),
                zip_code: "77068".to_string(),
            },
            emergency_contact: EmergencyContact {
                name: "Carlos Gonzalez".to_string(),
                phone: "(713) 555-0124".to_string(),
                relationship: "Husband".to_string(),
            },
            enrollment_date: date(2024, 2, 15),
            program: Program::Esthetician,
            status: StudentStatus::Active,
            total_hours_required: 750.0,
            hours_completed: 320.0,
            gpa: 3.7,
            tuition_paid: 3500.0,
            tuition_total: 7000.0,
            profile_image: None,
        },
        Student {
            id: "student-2".to_string(),
            first_name: "Ashley".to_string(),
            last_name: "Johnson".to_string(),
            email: "ashley.johnson@email.com".to_string(),
            phone: "(832) 555-0198".to_string(),
            date_of_birth: Some(date(1998, 7, 22)),
            address: Address {
                street: "456 Cypress Ave".to_string(),
                city: "Houston".to_string(),
                state: "TX".to_string(),
                zip_code: "77068".to_string(),
            },
            emergency_contact: EmergencyContact {
                name: "Linda Johnson".to_string(),
                phone: "(832) 555-0199".to_string(),
                relationship: "Mother".to_string(),
            },
            enrollment_date: date(2024, 1, 10),
            program: Program::AdvancedEsthetician,
            status: StudentStatus::Active,
            total_hours_required: 750.0,
            hours_completed: 580.0,
            gpa: 3.9,
            tuition_paid: 8770.0,
            tuition_total: 8770.0,
            profile_image: None,
        },
    ]
}

/// One grade for each seeded student.
#[must_use]
pub fn grades() -> Vec<Grade> {
    vec![
        Grade {
            id: "grade-1".to_string(),
            student_id: "student-1".to_string(),
            subject: "Facial Treatments".to_string(),
            assessment_type: AssessmentType::Practical,
            assessment_name: "Basic Facial Techniques".to_string(),
            score: 88.0,
            max_score: 100.0,
            date_graded: date(2024, 11, 1),
            instructor: "Ms. Rodriguez".to_string(),
            comments: Some("Excellent technique, needs practice on timing".to_string()),
        },
        Grade {
            id: "grade-2".to_string(),
            student_id: "student-2".to_string(),
            subject: "Advanced Skin Analysis".to_string(),
            assessment_type: AssessmentType::Written,
            assessment_name: "Skin Disorders Exam".to_string(),
            score: 94.0,
            max_score: 100.0,
            date_graded: date(2024, 10, 28),
            instructor: "Dr. Martinez".to_string(),
            comments: Some("Outstanding knowledge of skin conditions".to_string()),
        },
    ]
}
