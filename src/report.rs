use std::collections::BTreeSet;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::breakdown;
use crate::config::DEFAULT_RISK_THRESHOLD;
use crate::correlation;
use crate::dataset::Dataset;
use crate::difficulty;
use crate::gpa;
use crate::models::{CorrelationBand, GpaResult};
use crate::risk;
use crate::stats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub average_gpa: Option<f64>,
    pub median_gpa: Option<f64>,
    pub total_students: usize,
    /// Distinct students with at least one course below the risk threshold.
    pub at_risk_students: usize,
    pub at_risk_enrollments: usize,
    pub risk_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Insight {
    BestDepartment {
        department: String,
        average_score: f64,
    },
    HardestCourse {
        course: String,
        average_score: f64,
        difficulty_score: f64,
    },
    AttendanceCorrelation {
        correlation: f64,
        interpretation: CorrelationBand,
    },
}

/// Assembles the composite report. Insights whose inputs are empty are
/// left out rather than failing the report. The at-risk counts always use
/// [`DEFAULT_RISK_THRESHOLD`]; a tuned threshold only affects the at-risk view.
pub fn build_report(dataset: &Dataset, generated_at: DateTime<Utc>) -> AnalyticsReport {
    let averages = gpa::course_averages(dataset);
    let gpa_table = gpa::calculate_gpa(&averages);
    let at_risk = risk::identify_at_risk(dataset, &averages, DEFAULT_RISK_THRESHOLD);
    let at_risk_students: BTreeSet<_> = at_risk.iter().map(|r| r.student_id).collect();

    let summary = ReportSummary {
        average_gpa: gpa_mean(&gpa_table),
        median_gpa: gpa_median(&gpa_table),
        total_students: gpa_table.len(),
        at_risk_students: at_risk_students.len(),
        at_risk_enrollments: at_risk.len(),
        risk_threshold: DEFAULT_RISK_THRESHOLD,
    };

    let mut insights = Vec::new();

    match breakdown::department_comparison(dataset).into_iter().next() {
        Some(best) => insights.push(Insight::BestDepartment {
            department: best.department,
            average_score: stats::round_to(best.average_score, 2),
        }),
        None => tracing::warn!("No graded departments; skipping best department insight"),
    }

    match difficulty::course_difficulty(dataset).into_iter().next() {
        Some(hardest) => insights.push(Insight::HardestCourse {
            course: hardest.course_name,
            average_score: stats::round_to(hardest.average_score, 2),
            difficulty_score: stats::round_to(hardest.difficulty_score, 2),
        }),
        None => tracing::warn!("No graded courses; skipping hardest course insight"),
    }

    match correlation::attendance_correlation(dataset).coefficient {
        Some(coefficient) => insights.push(Insight::AttendanceCorrelation {
            correlation: stats::round_to(coefficient, 3),
            interpretation: correlation::correlation_band(coefficient),
        }),
        None => tracing::warn!("Attendance correlation undefined; skipping insight"),
    }

    tracing::info!(
        students = summary.total_students,
        at_risk = summary.at_risk_students,
        insights = insights.len(),
        "Assembled analytics report"
    );

    AnalyticsReport {
        generated_at,
        summary,
        insights,
    }
}

fn gpa_mean(gpa_table: &[GpaResult]) -> Option<f64> {
    let values: Vec<f64> = gpa_table.iter().map(|row| row.gpa).collect();
    stats::mean(&values).map(|value| stats::round_to(value, 2))
}

fn gpa_median(gpa_table: &[GpaResult]) -> Option<f64> {
    let values: Vec<f64> = gpa_table.iter().map(|row| row.gpa).collect();
    stats::median(&values).map(|value| stats::round_to(value, 2))
}

pub fn render_markdown(report: &AnalyticsReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(output, "# Student Performance Analytics Report");
    let _ = writeln!(
        output,
        "Generated at {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");

    match (summary.average_gpa, summary.median_gpa) {
        (Some(average), Some(median)) => {
            let _ = writeln!(output, "- Average GPA: {average:.2}");
            let _ = writeln!(output, "- Median GPA: {median:.2}");
        }
        _ => {
            let _ = writeln!(output, "- No graded students on record.");
        }
    }
    let _ = writeln!(output, "- Students with a GPA: {}", summary.total_students);
    let _ = writeln!(
        output,
        "- At-risk students (average below {}): {} across {} courses",
        summary.risk_threshold, summary.at_risk_students, summary.at_risk_enrollments
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");

    if report.insights.is_empty() {
        let _ = writeln!(output, "No insights available for the current data.");
    }

    for insight in &report.insights {
        match insight {
            Insight::BestDepartment {
                department,
                average_score,
            } => {
                let _ = writeln!(
                    output,
                    "- Best department: {department} (average score {average_score:.2})"
                );
            }
            Insight::HardestCourse {
                course,
                average_score,
                difficulty_score,
            } => {
                let _ = writeln!(
                    output,
                    "- Hardest course: {course} (average score {average_score:.2}, difficulty {difficulty_score:.2})"
                );
            }
            Insight::AttendanceCorrelation {
                correlation,
                interpretation,
            } => {
                let _ = writeln!(
                    output,
                    "- Attendance vs. performance: {correlation:.3} ({})",
                    interpretation.as_str()
                );
            }
        }
    }

    output
}
