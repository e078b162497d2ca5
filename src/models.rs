use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AnalyticsError;

macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[cfg(test)]
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = AnalyticsError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(AnalyticsError::Conversion(format!(
                        "unknown {} value {:?}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(DifficultyLevel {
    Beginner => "Beginner",
    Intermediate => "Intermediate",
    Advanced => "Advanced",
});

text_enum!(AssessmentType {
    Quiz => "Quiz",
    Midterm => "Midterm",
    Final => "Final",
    Project => "Project",
    Assignment => "Assignment",
});

text_enum!(AttendanceStatus {
    Present => "Present",
    Absent => "Absent",
    Late => "Late",
    Excused => "Excused",
});

#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub grade_level: i32,
    pub department: String,
}

#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub department: String,
    pub credits: i32,
    pub difficulty: DifficultyLevel,
}

#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    pub assessment_type: AssessmentType,
}

#[derive(Debug, Clone)]
pub struct GradeRecord {
    pub student_id: Uuid,
    pub assessment_id: Uuid,
    pub score: f64,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: AttendanceStatus,
}

/// Score statistics for one enrolled (student, course) pair with at least one grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseAverage {
    pub student_id: Uuid,
    pub student_name: String,
    pub grade_level: i32,
    pub department: String,
    pub course_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub difficulty: DifficultyLevel,
    pub credits: i32,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub assessment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaResult {
    pub student_id: Uuid,
    pub student_name: String,
    pub gpa: f64,
    pub credits: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Critical,
    High,
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub course_id: Uuid,
    pub course_name: String,
    pub average_score: f64,
    pub failing_assessments: usize,
    pub total_assessments: usize,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyScore {
    pub course_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub difficulty: DifficultyLevel,
    pub department: String,
    pub enrolled_students: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub score_std_dev: f64,
    pub difficulty_score: f64,
}

/// Attendance rate and score for one (student, course) pair. The correlation
/// coefficient is reported once on [`AttendanceCorrelation`], not per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendancePair {
    pub student_id: Uuid,
    pub student_name: String,
    pub course_id: Uuid,
    pub course_name: String,
    pub total_classes: usize,
    pub classes_attended: usize,
    pub attendance_rate: f64,
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceCorrelation {
    pub pairs: Vec<AttendancePair>,
    /// Pearson coefficient over every pair that has a score; absent below two pairs.
    pub coefficient: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationBand {
    #[serde(rename = "Strong positive")]
    StrongPositive,
    Moderate,
    Weak,
}

impl CorrelationBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationBand::StrongPositive => "Strong positive",
            CorrelationBand::Moderate => "Moderate",
            CorrelationBand::Weak => "Weak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub average_score: f64,
    pub submissions: usize,
    pub unique_students: usize,
    /// Trailing moving average; only computed once there are more than seven dates.
    pub smoothed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentPerformance {
    pub department: String,
    pub total_students: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub score_std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentTypePerformance {
    pub assessment_type: AssessmentType,
    pub students_evaluated: usize,
    pub submissions: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub score_std_dev: f64,
}
