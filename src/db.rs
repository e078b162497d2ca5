use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::models::{
    AssessmentRecord, AttendanceRecord, CourseRecord, EnrollmentRecord, GradeRecord,
    StudentRecord,
};

pub async fn init_db(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Reads every table the metrics need, one query per table.
pub async fn fetch_dataset(pool: &PgPool) -> Result<Dataset> {
    let dataset = Dataset {
        students: fetch_students(pool).await?,
        courses: fetch_courses(pool).await?,
        enrollments: fetch_enrollments(pool).await?,
        assessments: fetch_assessments(pool).await?,
        grades: fetch_grades(pool).await?,
        attendance: fetch_attendance(pool).await?,
    };

    tracing::info!(
        students = dataset.students.len(),
        courses = dataset.courses.len(),
        enrollments = dataset.enrollments.len(),
        assessments = dataset.assessments.len(),
        grades = dataset.grades.len(),
        attendance = dataset.attendance.len(),
        "Loaded dataset"
    );

    Ok(dataset)
}

async fn fetch_students(pool: &PgPool) -> Result<Vec<StudentRecord>> {
    let rows = sqlx::query(
        "SELECT id, full_name, email, grade_level, department \
         FROM student_analytics.students \
         ORDER BY full_name, id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(student_from_row).collect()
}

fn student_from_row(row: &PgRow) -> Result<StudentRecord> {
    Ok(StudentRecord {
        id: row.try_get("id")?,
        name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        grade_level: row.try_get("grade_level")?,
        department: row.try_get("department")?,
    })
}

async fn fetch_courses(pool: &PgPool) -> Result<Vec<CourseRecord>> {
    let rows = sqlx::query(
        "SELECT id, course_code, course_name, department, credits, difficulty_level \
         FROM student_analytics.courses \
         ORDER BY course_code",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(course_from_row).collect()
}

fn course_from_row(row: &PgRow) -> Result<CourseRecord> {
    Ok(CourseRecord {
        id: row.try_get("id")?,
        code: row.try_get("course_code")?,
        name: row.try_get("course_name")?,
        department: row.try_get("department")?,
        credits: row.try_get("credits")?,
        difficulty: row.try_get::<String, _>("difficulty_level")?.parse()?,
    })
}

async fn fetch_enrollments(pool: &PgPool) -> Result<Vec<EnrollmentRecord>> {
    let rows = sqlx::query(
        "SELECT DISTINCT student_id, course_id \
         FROM student_analytics.enrollments \
         ORDER BY student_id, course_id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(enrollment_from_row).collect()
}

fn enrollment_from_row(row: &PgRow) -> Result<EnrollmentRecord> {
    Ok(EnrollmentRecord {
        student_id: row.try_get("student_id")?,
        course_id: row.try_get("course_id")?,
    })
}

async fn fetch_assessments(pool: &PgPool) -> Result<Vec<AssessmentRecord>> {
    let rows = sqlx::query(
        "SELECT id, course_id, assessment_type \
         FROM student_analytics.assessments \
         ORDER BY course_id, id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(assessment_from_row).collect()
}

fn assessment_from_row(row: &PgRow) -> Result<AssessmentRecord> {
    Ok(AssessmentRecord {
        id: row.try_get("id")?,
        course_id: row.try_get("course_id")?,
        assessment_type: row.try_get::<String, _>("assessment_type")?.parse()?,
    })
}

async fn fetch_grades(pool: &PgPool) -> Result<Vec<GradeRecord>> {
    let rows = sqlx::query(
        "SELECT student_id, assessment_id, score, submitted_at \
         FROM student_analytics.grades \
         ORDER BY submitted_at, id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(grade_from_row).collect()
}

fn grade_from_row(row: &PgRow) -> Result<GradeRecord> {
    Ok(GradeRecord {
        student_id: row.try_get("student_id")?,
        assessment_id: row.try_get("assessment_id")?,
        score: row.try_get("score")?,
        submitted_at: row.try_get("submitted_at")?,
    })
}

async fn fetch_attendance(pool: &PgPool) -> Result<Vec<AttendanceRecord>> {
    let rows = sqlx::query(
        "SELECT student_id, course_id, status \
         FROM student_analytics.attendance \
         ORDER BY attended_on, id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(attendance_from_row).collect()
}

fn attendance_from_row(row: &PgRow) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        student_id: row.try_get("student_id")?,
        course_id: row.try_get("course_id")?,
        status: row.try_get::<String, _>("status")?.parse()?,
    })
}
