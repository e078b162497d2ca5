//! Score breakdowns by student department and by assessment type.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::dataset::Dataset;
use crate::models::{AssessmentType, AssessmentTypePerformance, DepartmentPerformance};
use crate::stats;

#[derive(Default)]
struct Group {
    scores: Vec<f64>,
    students: BTreeSet<Uuid>,
}

struct Summary {
    average: f64,
    min: f64,
    max: f64,
    std_dev: f64,
}

impl Group {
    fn summary(&self) -> Option<Summary> {
        Some(Summary {
            average: stats::mean(&self.scores)?,
            min: stats::min(&self.scores)?,
            max: stats::max(&self.scores)?,
            std_dev: stats::sample_std_dev(&self.scores),
        })
    }
}

/// Departments ranked by the mean of the grades their students earned in
/// enrolled courses. Departments without grades are omitted.
pub fn department_comparison(dataset: &Dataset) -> Vec<DepartmentPerformance> {
    let students = dataset.students_by_id();
    let mut groups: BTreeMap<String, Group> = BTreeMap::new();

    for (student_id, _) in dataset.enrolled_pairs() {
        if let Some(student) = students.get(&student_id) {
            groups
                .entry(student.department.clone())
                .or_default()
                .students
                .insert(student_id);
        }
    }

    for ((student_id, _), scores) in dataset.enrolled_scores() {
        if let Some(student) = students.get(&student_id) {
            groups
                .entry(student.department.clone())
                .or_default()
                .scores
                .extend(scores);
        }
    }

    let mut rows: Vec<DepartmentPerformance> = groups
        .into_iter()
        .filter_map(|(department, group)| {
            let summary = group.summary()?;
            Some(DepartmentPerformance {
                department,
                total_students: group.students.len(),
                average_score: summary.average,
                min_score: summary.min,
                max_score: summary.max,
                score_std_dev: summary.std_dev,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then_with(|| a.department.cmp(&b.department))
    });
    rows
}

pub fn assessment_type_analysis(dataset: &Dataset) -> Vec<AssessmentTypePerformance> {
    let mut groups: BTreeMap<AssessmentType, Group> = BTreeMap::new();

    for course_grade in dataset.course_grades() {
        let group = groups
            .entry(course_grade.assessment.assessment_type)
            .or_default();
        group.scores.push(course_grade.grade.score);
        group.students.insert(course_grade.grade.student_id);
    }

    let mut rows: Vec<AssessmentTypePerformance> = groups
        .into_iter()
        .filter_map(|(assessment_type, group)| {
            let summary = group.summary()?;
            Some(AssessmentTypePerformance {
                assessment_type,
                students_evaluated: group.students.len(),
                submissions: group.scores.len(),
                average_score: summary.average,
                min_score: summary.min,
                max_score: summary.max,
                score_std_dev: summary.std_dev,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then(a.assessment_type.cmp(&b.assessment_type))
    });
    rows
}
