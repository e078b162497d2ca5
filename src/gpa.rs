use std::collections::BTreeMap;

use uuid::Uuid;

use crate::dataset::Dataset;
use crate::models::{CourseAverage, GpaResult};
use crate::stats;

/// Inclusive lower bounds, highest first.
const GRADE_SCALE: [(f64, f64); 10] = [
    (93.0, 4.0),
    (90.0, 3.7),
    (87.0, 3.3),
    (83.0, 3.0),
    (80.0, 2.7),
    (77.0, 2.3),
    (73.0, 2.0),
    (70.0, 1.7),
    (67.0, 1.3),
    (60.0, 1.0),
];

pub fn grade_point(score: f64) -> f64 {
    GRADE_SCALE
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// Mean, min and max score for every enrolled (student, course) pair that
/// has at least one grade.
pub fn course_averages(dataset: &Dataset) -> Vec<CourseAverage> {
    let students = dataset.students_by_id();
    let courses = dataset.courses_by_id();
    let mut averages = Vec::new();

    for ((student_id, course_id), scores) in dataset.enrolled_scores() {
        let (Some(student), Some(course)) = (students.get(&student_id), courses.get(&course_id))
        else {
            continue;
        };
        let (Some(mean), Some(min), Some(max)) = (
            stats::mean(&scores),
            stats::min(&scores),
            stats::max(&scores),
        ) else {
            continue;
        };

        averages.push(CourseAverage {
            student_id,
            student_name: student.name.clone(),
            grade_level: student.grade_level,
            department: student.department.clone(),
            course_id,
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            difficulty: course.difficulty,
            credits: course.credits,
            mean,
            min,
            max,
            assessment_count: scores.len(),
        });
    }

    averages.sort_by(|a, b| {
        a.student_name
            .cmp(&b.student_name)
            .then(a.student_id.cmp(&b.student_id))
            .then(b.mean.total_cmp(&a.mean))
    });
    averages
}

/// Credit-weighted GPA per student, highest first. Students without any
/// credited course average are left out.
pub fn calculate_gpa(averages: &[CourseAverage]) -> Vec<GpaResult> {
    let mut totals: BTreeMap<Uuid, (String, f64, i32)> = BTreeMap::new();

    for average in averages {
        let entry = totals
            .entry(average.student_id)
            .or_insert_with(|| (average.student_name.clone(), 0.0, 0));
        entry.1 += grade_point(average.mean) * f64::from(average.credits);
        entry.2 += average.credits;
    }

    let mut results: Vec<GpaResult> = totals
        .into_iter()
        .filter(|(_, (_, _, credits))| *credits > 0)
        .map(|(student_id, (student_name, weighted_points, credits))| GpaResult {
            student_id,
            student_name,
            gpa: stats::round_to(weighted_points / f64::from(credits), 2),
            credits,
        })
        .collect();

    results.sort_by(|a, b| {
        b.gpa
            .total_cmp(&a.gpa)
            .then_with(|| a.student_name.cmp(&b.student_name))
            .then(a.student_id.cmp(&b.student_id))
    });
    results
}

pub fn top_performers(gpa: &[GpaResult], limit: usize) -> Vec<GpaResult> {
    gpa.iter().take(limit).cloned().collect()
}
