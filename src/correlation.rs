use std::collections::BTreeMap;

use uuid::Uuid;

use crate::dataset::Dataset;
use crate::models::{AttendanceCorrelation, AttendancePair, AttendanceStatus, CorrelationBand};
use crate::stats;

/// Relates attendance rate to average score across enrolled (student, course)
/// pairs that have attendance on record.
pub fn attendance_correlation(dataset: &Dataset) -> AttendanceCorrelation {
    let students = dataset.students_by_id();
    let courses = dataset.courses_by_id();
    let enrolled = dataset.enrolled_pairs();
    let scores = dataset.enrolled_scores();

    let mut tallies: BTreeMap<(Uuid, Uuid), (usize, usize)> = BTreeMap::new();
    for record in &dataset.attendance {
        let key = (record.student_id, record.course_id);
        if !enrolled.contains(&key) {
            continue;
        }
        let tally = tallies.entry(key).or_insert((0, 0));
        tally.0 += 1;
        if record.status == AttendanceStatus::Present {
            tally.1 += 1;
        }
    }

    let mut pairs: Vec<AttendancePair> = tallies
        .into_iter()
        .filter(|(_, (total, _))| *total > 0)
        .filter_map(|((student_id, course_id), (total_classes, classes_attended))| {
            let student = students.get(&student_id)?;
            let course = courses.get(&course_id)?;
            Some(AttendancePair {
                student_id,
                student_name: student.name.clone(),
                course_id,
                course_name: course.name.clone(),
                total_classes,
                classes_attended,
                attendance_rate: classes_attended as f64 / total_classes as f64 * 100.0,
                average_score: scores
                    .get(&(student_id, course_id))
                    .and_then(|values| stats::mean(values)),
            })
        })
        .collect();

    pairs.sort_by(|a, b| {
        b.attendance_rate
            .total_cmp(&a.attendance_rate)
            .then_with(|| a.student_name.cmp(&b.student_name))
            .then_with(|| a.course_name.cmp(&b.course_name))
    });

    let (rates, averages): (Vec<f64>, Vec<f64>) = pairs
        .iter()
        .filter_map(|pair| pair.average_score.map(|score| (pair.attendance_rate, score)))
        .unzip();
    let coefficient = stats::pearson(&rates, &averages);

    tracing::debug!(
        pairs = pairs.len(),
        scored_pairs = rates.len(),
        coefficient = ?coefficient,
        "Correlated attendance with performance"
    );

    AttendanceCorrelation { pairs, coefficient }
}

pub fn correlation_band(coefficient: f64) -> CorrelationBand {
    if coefficient > 0.7 {
        CorrelationBand::StrongPositive
    } else if coefficient > 0.4 {
        CorrelationBand::Moderate
    } else {
        CorrelationBand::Weak
    }
}
