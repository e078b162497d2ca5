use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::dataset::Dataset;
use crate::models::DifficultyScore;
use crate::stats;

pub const STD_DEV_WEIGHT: f64 = 0.5;

/// Lower mean and wider spread both push the score up.
pub fn difficulty_score(course_mean: f64, course_std_dev: f64) -> f64 {
    (100.0 - course_mean) + STD_DEV_WEIGHT * course_std_dev
}

/// Ranks courses hardest first from every grade recorded against their
/// assessments. Only courses with at least one enrollment are ranked, and
/// courses with no grades have no mean and are left out.
pub fn course_difficulty(dataset: &Dataset) -> Vec<DifficultyScore> {
    let mut scores_by_course: BTreeMap<Uuid, Vec<f64>> = BTreeMap::new();
    for course_grade in dataset.course_grades() {
        scores_by_course
            .entry(course_grade.course_id())
            .or_default()
            .push(course_grade.grade.score);
    }

    let mut enrolled: BTreeMap<Uuid, BTreeSet<Uuid>> = BTreeMap::new();
    for (student_id, course_id) in dataset.enrolled_pairs() {
        enrolled.entry(course_id).or_default().insert(student_id);
    }

    let mut ranked: Vec<DifficultyScore> = dataset
        .courses
        .iter()
        .filter_map(|course| {
            let enrolled_students = enrolled.get(&course.id)?.len();
            let scores = scores_by_course.get(&course.id)?;
            let average_score = stats::mean(scores)?;
            let score_std_dev = stats::sample_std_dev(scores);

            Some(DifficultyScore {
                course_id: course.id,
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                difficulty: course.difficulty,
                department: course.department.clone(),
                enrolled_students,
                average_score,
                min_score: stats::min(scores)?,
                max_score: stats::max(scores)?,
                score_std_dev,
                difficulty_score: difficulty_score(average_score, score_std_dev),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.difficulty_score
            .total_cmp(&a.difficulty_score)
            .then_with(|| a.course_code.cmp(&b.course_code))
    });

    tracing::debug!(courses = ranked.len(), "Scored course difficulty");
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::DatasetBuilder;

    #[test]
    fn combines_mean_and_spread() {
        assert_eq!(difficulty_score(70.0, 10.0), 35.0);
        assert_eq!(difficulty_score(100.0, 0.0), 0.0);
    }

    #[test]
    fn ranks_hardest_course_first() {
        let mut builder = DatasetBuilder::new();
        let student = builder.student("Avery Lee", "Computer Science");
        let intro = builder.course("CS101", 3);
        let ml = builder.course("CS302", 4);
        let calculus = builder.course("MATH101", 4);
        for (course, scores) in [
            (intro, [90.0, 94.0]),
            (ml, [55.0, 75.0]),
            (calculus, [70.0, 80.0]),
        ] {
            builder.enroll(student, course);
            for score in scores {
                builder.grade(student, course, score, "2026-01-20");
            }
        }
        let ranked = course_difficulty(&builder.build());

        let codes: Vec<&str> = ranked.iter().map(|c| c.course_code.as_str()).collect();
        assert_eq!(codes, vec!["CS302", "MATH101", "CS101"]);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].difficulty_score >= pair[1].difficulty_score));

        let ml_row = &ranked[0];
        assert_eq!(ml_row.average_score, 65.0);
        let expected = 35.0 + 0.5 * 200f64.sqrt();
        assert!((ml_row.difficulty_score - expected).abs() < 1e-9);
        assert_eq!(ml_row.enrolled_students, 1);
    }

    #[test]
    fn single_grade_has_zero_spread() {
        let mut builder = DatasetBuilder::new();
        let student = builder.student("Jules Moreno", "Business");
        let course = builder.course("BUS101", 3);
        builder.enroll(student, course);
        builder.grade(student, course, 72.0, "2026-01-20");
        let ranked = course_difficulty(&builder.build());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score_std_dev, 0.0);
        assert_eq!(ranked[0].difficulty_score, 28.0);
    }

    #[test]
    fn ungraded_courses_are_omitted() {
        let mut builder = DatasetBuilder::new();
        builder.course("CS999", 3);
        assert!(course_difficulty(&builder.build()).is_empty());
    }

    #[test]
    fn courses_without_enrollments_are_omitted() {
        let mut builder = DatasetBuilder::new();
        let student = builder.student("Avery Lee", "Physics");
        let taught = builder.course("PHYS101", 4);
        let orphan = builder.course("PHYS999", 4);
        builder.enroll(student, taught);
        builder.grade(student, taught, 81.0, "2026-01-20");
        builder.grade(student, orphan, 40.0, "2026-01-20");
        let ranked = course_difficulty(&builder.build());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].course_code, "PHYS101");
        assert_eq!(ranked[0].enrolled_students, 1);
    }
}
