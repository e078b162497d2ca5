use crate::dataset::Dataset;
use crate::models::{CourseAverage, RiskAssessment, RiskLevel};

/// Flags every course average strictly below `threshold`, worst first.
pub fn identify_at_risk(
    dataset: &Dataset,
    averages: &[CourseAverage],
    threshold: f64,
) -> Vec<RiskAssessment> {
    let students = dataset.students_by_id();
    let scores = dataset.enrolled_scores();

    let mut flagged: Vec<RiskAssessment> = averages
        .iter()
        .filter(|average| average.assessment_count > 0 && average.mean < threshold)
        .map(|average| {
            let failing_assessments = scores
                .get(&(average.student_id, average.course_id))
                .map(|values| values.iter().filter(|score| **score < threshold).count())
                .unwrap_or(0);

            RiskAssessment {
                student_id: average.student_id,
                student_name: average.student_name.clone(),
                student_email: students
                    .get(&average.student_id)
                    .map(|s| s.email.clone())
                    .unwrap_or_default(),
                course_id: average.course_id,
                course_name: average.course_name.clone(),
                average_score: average.mean,
                failing_assessments,
                total_assessments: average.assessment_count,
                risk_level: risk_level(average.mean),
            }
        })
        .collect();

    flagged.sort_by(|a, b| {
        a.average_score
            .total_cmp(&b.average_score)
            .then_with(|| a.student_name.cmp(&b.student_name))
            .then_with(|| a.course_name.cmp(&b.course_name))
    });
    flagged
}

pub fn risk_level(average_score: f64) -> RiskLevel {
    if average_score < 60.0 {
        RiskLevel::Critical
    } else if average_score < 65.0 {
        RiskLevel::High
    } else {
        RiskLevel::Moderate
    }
}
