//! Numeric helpers shared by the metric computers. Every helper returns
//! `None` instead of NaN when its input cannot produce a defined value.

use statrs::statistics::{Data, Median, Statistics};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::mean(values))
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values.to_vec()).median())
}

pub fn min(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::min(values))
}

pub fn max(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::max(values))
}

/// Sample standard deviation (n - 1). Fewer than two observations yield 0.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let value = Statistics::std_dev(values);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Pearson correlation of two equally long series, clamped into [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let covariance = Statistics::covariance(xs, ys);
    let spread = Statistics::std_dev(xs) * Statistics::std_dev(ys);
    let r = covariance / spread;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_undefined() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn median_handles_even_counts() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn std_dev_is_sample_based() {
        let value = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((value - 2.138_089_935).abs() < 1e-6);
        assert_eq!(sample_std_dev(&[42.0]), 0.0);
    }

    #[test]
    fn pearson_detects_perfect_linear_relation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [10.0, 20.0, 30.0, 40.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-9);

        let inverse = [40.0, 30.0, 20.0, 10.0];
        let r = pearson(&xs, &inverse).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_is_undefined_for_short_or_flat_series() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[5.0, 5.0]), None);
    }

    #[test]
    fn rounds_to_requested_places() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(2.675_000_1, 2), 2.68);
    }
}
