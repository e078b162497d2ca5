use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::breakdown;
use crate::config::AnalyticsConfig;
use crate::correlation;
use crate::dataset::Dataset;
use crate::difficulty;
use crate::error::{AnalyticsError, Result};
use crate::export;
use crate::gpa;
use crate::models::{
    AssessmentTypePerformance, AttendanceCorrelation, CourseAverage, DepartmentPerformance,
    DifficultyScore, GpaResult, RiskAssessment, TrendPoint,
};
use crate::report::{self, AnalyticsReport};
use crate::risk;
use crate::trend;

/// Every report the engine knows how to produce. Parsed from its kebab-case
/// name: `summary`, `gpa`, `top-performers`, `at-risk`, `course-difficulty`,
/// `attendance-correlation`, `trends`, `departments`, `assessment-types`,
/// `course-averages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Gpa,
    TopPerformers,
    AtRisk,
    CourseDifficulty,
    AttendanceCorrelation,
    Trends,
    Departments,
    AssessmentTypes,
    CourseAverages,
}

impl ReportKind {
    pub const ALL: [ReportKind; 10] = [
        ReportKind::Summary,
        ReportKind::Gpa,
        ReportKind::TopPerformers,
        ReportKind::AtRisk,
        ReportKind::CourseDifficulty,
        ReportKind::AttendanceCorrelation,
        ReportKind::Trends,
        ReportKind::Departments,
        ReportKind::AssessmentTypes,
        ReportKind::CourseAverages,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Gpa => "gpa",
            ReportKind::TopPerformers => "top-performers",
            ReportKind::AtRisk => "at-risk",
            ReportKind::CourseDifficulty => "course-difficulty",
            ReportKind::AttendanceCorrelation => "attendance-correlation",
            ReportKind::Trends => "trends",
            ReportKind::Departments => "departments",
            ReportKind::AssessmentTypes => "assessment-types",
            ReportKind::CourseAverages => "course-averages",
        }
    }

    pub fn is_tabular(&self) -> bool {
        !matches!(self, ReportKind::Summary)
    }
}

impl FromStr for ReportKind {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| AnalyticsError::UnknownReport(value.to_string()))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutput {
    Summary(AnalyticsReport),
    Gpa(Vec<GpaResult>),
    AtRisk(Vec<RiskAssessment>),
    CourseDifficulty(Vec<DifficultyScore>),
    AttendanceCorrelation(AttendanceCorrelation),
    Trends(Vec<TrendPoint>),
    Departments(Vec<DepartmentPerformance>),
    AssessmentTypes(Vec<AssessmentTypePerformance>),
    CourseAverages(Vec<CourseAverage>),
}

pub fn run(
    kind: ReportKind,
    dataset: &Dataset,
    config: &AnalyticsConfig,
    generated_at: DateTime<Utc>,
) -> Result<ReportOutput> {
    config.validate()?;
    tracing::debug!(report = %kind, "Computing report");

    let output = match kind {
        ReportKind::Summary => {
            ReportOutput::Summary(report::build_report(dataset, generated_at))
        }
        ReportKind::Gpa => {
            ReportOutput::Gpa(gpa::calculate_gpa(&gpa::course_averages(dataset)))
        }
        ReportKind::TopPerformers => {
            let table = gpa::calculate_gpa(&gpa::course_averages(dataset));
            ReportOutput::Gpa(gpa::top_performers(&table, config.top_n))
        }
        ReportKind::AtRisk => {
            let averages = gpa::course_averages(dataset);
            ReportOutput::AtRisk(risk::identify_at_risk(
                dataset,
                &averages,
                config.risk_threshold,
            ))
        }
        ReportKind::CourseDifficulty => {
            ReportOutput::CourseDifficulty(difficulty::course_difficulty(dataset))
        }
        ReportKind::AttendanceCorrelation => {
            ReportOutput::AttendanceCorrelation(correlation::attendance_correlation(dataset))
        }
        ReportKind::Trends => ReportOutput::Trends(trend::score_trend(dataset)),
        ReportKind::Departments => {
            ReportOutput::Departments(breakdown::department_comparison(dataset))
        }
        ReportKind::AssessmentTypes => {
            ReportOutput::AssessmentTypes(breakdown::assessment_type_analysis(dataset))
        }
        ReportKind::CourseAverages => ReportOutput::CourseAverages(gpa::course_averages(dataset)),
    };

    Ok(output)
}

impl ReportOutput {
    pub fn row_count(&self) -> usize {
        match self {
            ReportOutput::Summary(_) => 1,
            ReportOutput::Gpa(rows) => rows.len(),
            ReportOutput::AtRisk(rows) => rows.len(),
            ReportOutput::CourseDifficulty(rows) => rows.len(),
            ReportOutput::AttendanceCorrelation(result) => result.pairs.len(),
            ReportOutput::Trends(rows) => rows.len(),
            ReportOutput::Departments(rows) => rows.len(),
            ReportOutput::AssessmentTypes(rows) => rows.len(),
            ReportOutput::CourseAverages(rows) => rows.len(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match (format, self) {
            (OutputFormat::Json, _) => Ok(serde_json::to_string_pretty(self)?),
            (OutputFormat::Markdown, ReportOutput::Summary(summary)) => {
                Ok(report::render_markdown(summary))
            }
            (OutputFormat::Markdown, _) => Err(AnalyticsError::InvalidParameter(
                "markdown output is only available for the summary report".to_string(),
            )),
            (OutputFormat::Csv, _) => {
                let mut buffer = Vec::new();
                self.write_csv(&mut buffer)?;
                String::from_utf8(buffer)
                    .map_err(|err| AnalyticsError::Conversion(err.to_string()))
            }
        }
    }

    /// Writes the tabular rows as CSV. The summary has no tabular form.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        match self {
            ReportOutput::Summary(_) => Err(AnalyticsError::InvalidParameter(
                "the summary report has no tabular form; use json or markdown".to_string(),
            )),
            ReportOutput::Gpa(rows) => export::write_rows(writer, rows),
            ReportOutput::AtRisk(rows) => export::write_rows(writer, rows),
            ReportOutput::CourseDifficulty(rows) => export::write_rows(writer, rows),
            ReportOutput::AttendanceCorrelation(result) => {
                export::write_rows(writer, &result.pairs)
            }
            ReportOutput::Trends(rows) => export::write_rows(writer, rows),
            ReportOutput::Departments(rows) => export::write_rows(writer, rows),
            ReportOutput::AssessmentTypes(rows) => export::write_rows(writer, rows),
            ReportOutput::CourseAverages(rows) => export::write_rows(writer, rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::DatasetBuilder;

    fn dataset() -> Dataset {
        let mut builder = DatasetBuilder::new();
        let course = builder.course("CS101", 3);
        for (name, score) in [("Ada", 92.0), ("Ben", 58.0), ("Cy", 77.0)] {
            let student = builder.student(name, "Computer Science");
            builder.enroll(student, course);
            builder.grade(student, course, score, "2026-01-20");
        }
        builder.build()
    }

    #[test]
    fn names_parse_back_to_kinds() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.name().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_name_is_a_lookup_failure() {
        let err = "leaderboard".parse::<ReportKind>().unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownReport(name) if name == "leaderboard"));
    }

    #[test]
    fn top_performers_honours_limit() {
        let config = AnalyticsConfig {
            top_n: 2,
            ..AnalyticsConfig::default()
        };
        let output = run(ReportKind::TopPerformers, &dataset(), &config, Utc::now()).unwrap();
        assert_eq!(output.row_count(), 2);
    }

    #[test]
    fn at_risk_uses_configured_threshold() {
        let config = AnalyticsConfig {
            risk_threshold: 80.0,
            ..AnalyticsConfig::default()
        };
        let output = run(ReportKind::AtRisk, &dataset(), &config, Utc::now()).unwrap();
        assert_eq!(output.row_count(), 2);
    }

    #[test]
    fn summary_counts_ignore_configured_threshold() {
        let config = AnalyticsConfig {
            risk_threshold: 80.0,
            ..AnalyticsConfig::default()
        };
        let tuned = run(ReportKind::Summary, &dataset(), &config, Utc::now()).unwrap();
        let ReportOutput::Summary(report) = tuned else {
            panic!("expected a summary");
        };

        assert_eq!(report.summary.at_risk_students, 1);
        assert_eq!(report.summary.risk_threshold, 70.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalyticsConfig {
            top_n: 0,
            ..AnalyticsConfig::default()
        };
        assert!(run(ReportKind::Gpa, &dataset(), &config, Utc::now()).is_err());
    }

    #[test]
    fn summary_rejects_csv_and_tables_reject_markdown() {
        let config = AnalyticsConfig::default();
        let summary = run(ReportKind::Summary, &dataset(), &config, Utc::now()).unwrap();
        assert!(summary.render(OutputFormat::Csv).is_err());
        assert!(summary.render(OutputFormat::Markdown).is_ok());

        let gpa = run(ReportKind::Gpa, &dataset(), &config, Utc::now()).unwrap();
        assert!(gpa.render(OutputFormat::Markdown).is_err());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let config = AnalyticsConfig::default();
        let output = run(ReportKind::Gpa, &dataset(), &config, Utc::now()).unwrap();
        let csv = output.render(OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "student_id,student_name,gpa,credits");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains(",Ada,3.7,3"));
    }

    #[test]
    fn correlation_json_reports_coefficient_once() {
        let config = AnalyticsConfig::default();
        let output =
            run(ReportKind::AttendanceCorrelation, &dataset(), &config, Utc::now()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&output.render(OutputFormat::Json).unwrap()).unwrap();

        assert!(json.get("coefficient").is_some());
        assert!(json["pairs"].as_array().unwrap().is_empty());
    }
}
