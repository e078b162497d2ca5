use std::collections::{BTreeMap, BTreeSet, HashMap};

use uuid::Uuid;

use crate::models::{
    AssessmentRecord, AttendanceRecord, CourseRecord, EnrollmentRecord, GradeRecord,
    StudentRecord,
};

/// One bulk read of the data store. Every metric is computed from this
/// snapshot, so a single invocation never re-queries per group.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub students: Vec<StudentRecord>,
    pub courses: Vec<CourseRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
    pub assessments: Vec<AssessmentRecord>,
    pub grades: Vec<GradeRecord>,
    pub attendance: Vec<AttendanceRecord>,
}

/// A grade resolved to the course its assessment belongs to.
#[derive(Debug, Clone, Copy)]
pub struct CourseGrade<'a> {
    pub grade: &'a GradeRecord,
    pub assessment: &'a AssessmentRecord,
}

impl<'a> CourseGrade<'a> {
    pub fn course_id(&self) -> Uuid {
        self.assessment.course_id
    }
}

impl Dataset {
    pub fn students_by_id(&self) -> HashMap<Uuid, &StudentRecord> {
        self.students.iter().map(|s| (s.id, s)).collect()
    }

    pub fn courses_by_id(&self) -> HashMap<Uuid, &CourseRecord> {
        self.courses.iter().map(|c| (c.id, c)).collect()
    }

    /// Distinct (student, course) enrollment pairs; repeat semesters collapse.
    pub fn enrolled_pairs(&self) -> BTreeSet<(Uuid, Uuid)> {
        self.enrollments
            .iter()
            .map(|e| (e.student_id, e.course_id))
            .collect()
    }

    /// Every grade whose assessment is known, joined to that assessment.
    pub fn course_grades(&self) -> Vec<CourseGrade<'_>> {
        let assessments: HashMap<Uuid, &AssessmentRecord> =
            self.assessments.iter().map(|a| (a.id, a)).collect();

        self.grades
            .iter()
            .filter_map(|grade| {
                assessments
                    .get(&grade.assessment_id)
                    .copied()
                    .map(|assessment| CourseGrade { grade, assessment })
            })
            .collect()
    }

    /// Grades the student earned in a course they are enrolled in, keyed by
    /// (student, course). Pairs without grades are absent.
    pub fn enrolled_grades(&self) -> BTreeMap<(Uuid, Uuid), Vec<CourseGrade<'_>>> {
        let enrolled = self.enrolled_pairs();
        let mut grouped: BTreeMap<(Uuid, Uuid), Vec<CourseGrade<'_>>> = BTreeMap::new();

        for course_grade in self.course_grades() {
            let key = (course_grade.grade.student_id, course_grade.course_id());
            if enrolled.contains(&key) {
                grouped.entry(key).or_default().push(course_grade);
            }
        }

        grouped
    }

    /// Scores per enrolled (student, course) pair.
    pub fn enrolled_scores(&self) -> BTreeMap<(Uuid, Uuid), Vec<f64>> {
        self.enrolled_grades()
            .into_iter()
            .map(|(key, grades)| (key, grades.iter().map(|g| g.grade.score).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::DatasetBuilder;

    #[test]
    fn grades_outside_enrollment_are_ignored() {
        let mut builder = DatasetBuilder::new();
        let student = builder.student("Avery Lee", "Mathematics");
        let enrolled = builder.course("MATH101", 4);
        let other = builder.course("CS101", 3);
        builder.enroll(student, enrolled);
        builder.grade(student, enrolled, 88.0, "2026-02-02");
        builder.grade(student, other, 40.0, "2026-02-02");
        let dataset = builder.build();

        let scores = dataset.enrolled_scores();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[&(student, enrolled)], vec![88.0]);
        assert_eq!(dataset.course_grades().len(), 2);
    }

    #[test]
    fn repeat_enrollment_counts_once() {
        let mut builder = DatasetBuilder::new();
        let student = builder.student("Jules Moreno", "Physics");
        let course = builder.course("PHYS101", 4);
        builder.enroll(student, course);
        builder.enroll(student, course);
        builder.grade(student, course, 71.0, "2026-01-10");
        let dataset = builder.build();

        assert_eq!(dataset.enrolled_pairs().len(), 1);
        assert_eq!(dataset.enrolled_scores()[&(student, course)], vec![71.0]);
    }
}
