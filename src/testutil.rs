//! Fixture builder for metric tests.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::dataset::Dataset;
use crate::models::{
    AssessmentRecord, AssessmentType, AttendanceRecord, AttendanceStatus, CourseRecord,
    DifficultyLevel, EnrollmentRecord, GradeRecord, StudentRecord,
};

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("fixture date")
}

#[derive(Default)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(&mut self, name: &str, department: &str) -> Uuid {
        let id = Uuid::new_v4();
        let email = format!("{}@example.edu", name.to_lowercase().replace(' ', "."));
        self.dataset.students.push(StudentRecord {
            id,
            name: name.to_string(),
            email,
            grade_level: 2,
            department: department.to_string(),
        });
        id
    }

    pub fn course(&mut self, code: &str, credits: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.dataset.courses.push(CourseRecord {
            id,
            code: code.to_string(),
            name: format!("{code} course"),
            department: "General".to_string(),
            credits,
            difficulty: DifficultyLevel::Intermediate,
        });
        id
    }

    pub fn enroll(&mut self, student_id: Uuid, course_id: Uuid) {
        self.dataset.enrollments.push(EnrollmentRecord {
            student_id,
            course_id,
        });
    }

    pub fn assessment(&mut self, course_id: Uuid, assessment_type: AssessmentType) -> Uuid {
        let id = Uuid::new_v4();
        self.dataset.assessments.push(AssessmentRecord {
            id,
            course_id,
            assessment_type,
        });
        id
    }

    pub fn score(&mut self, student_id: Uuid, assessment_id: Uuid, score: f64, on: &str) {
        let submitted_at = date(on).and_hms_opt(10, 30, 0).expect("fixture time");
        self.dataset.grades.push(GradeRecord {
            student_id,
            assessment_id,
            score,
            submitted_at,
        });
    }

    /// Records a score against a fresh quiz in the course.
    pub fn grade(&mut self, student_id: Uuid, course_id: Uuid, score: f64, on: &str) {
        let assessment_id = self.assessment(course_id, AssessmentType::Quiz);
        self.score(student_id, assessment_id, score, on);
    }

    pub fn attend(&mut self, student_id: Uuid, course_id: Uuid, status: AttendanceStatus) {
        self.dataset.attendance.push(AttendanceRecord {
            student_id,
            course_id,
            status,
        });
    }

    pub fn build(self) -> Dataset {
        self.dataset
    }
}
