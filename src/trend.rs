use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::dataset::Dataset;
use crate::models::TrendPoint;
use crate::stats;

pub const SMOOTHING_WINDOW: usize = 7;

/// Daily score trend, oldest first. Smoothing kicks in once the series is
/// longer than one window.
pub fn score_trend(dataset: &Dataset) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, (Vec<f64>, BTreeSet<Uuid>)> = BTreeMap::new();
    for grade in &dataset.grades {
        let entry = by_date.entry(grade.submitted_at.date()).or_default();
        entry.0.push(grade.score);
        entry.1.insert(grade.student_id);
    }

    let mut points: Vec<TrendPoint> = by_date
        .into_iter()
        .filter_map(|(date, (scores, students))| {
            Some(TrendPoint {
                date,
                average_score: stats::mean(&scores)?,
                submissions: scores.len(),
                unique_students: students.len(),
                smoothed: None,
            })
        })
        .collect();

    if points.len() > SMOOTHING_WINDOW {
        let smoothed = trailing_average(
            &points.iter().map(|p| p.average_score).collect::<Vec<_>>(),
            SMOOTHING_WINDOW,
        );
        for (point, value) in points.iter_mut().zip(smoothed) {
            point.smoothed = value;
        }
    }

    points
}

/// Trailing mean over up to `window` observations; the leading points use
/// however many observations exist so far.
pub fn trailing_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|end| {
            let start = (end + 1).saturating_sub(window);
            stats::mean(&values[start..=end])
        })
        .collect()
}
