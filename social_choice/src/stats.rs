//! Descriptive statistics over rating lists.
//!
//! None of these functions return `NaN` or an infinity for finite inputs:
//! empty lists and zero deviations are handled explicitly.

/// Bound applied to z-scores before mapping them to a display range.
pub const Z_DISPLAY_BOUND: f64 = 3.0;

/// Arithmetic mean, 0 for an empty list.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
///
/// The mean is recomputed when not provided.
pub fn stddev(values: &[f64], mean_value: Option<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean_value.unwrap_or_else(|| mean(values));
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Number of standard deviations between `value` and `mean_value`. 0 when the deviation is 0.
pub fn z_score(value: f64, mean_value: f64, stddev_value: f64) -> f64 {
    if stddev_value == 0.0 {
        return 0.0;
    }
    (value - mean_value) / stddev_value
}

/// Clamps a z-score to `[-3, 3]` and maps it linearly to `[0, 100]`.
pub fn normalize_z(z: f64) -> f64 {
    let clamped = z.max(-Z_DISPLAY_BOUND).min(Z_DISPLAY_BOUND);
    (clamped + Z_DISPLAY_BOUND) / (2.0 * Z_DISPLAY_BOUND) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn empty_inputs_are_neutral() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(stddev(&[], None), 0.0);
        assert_eq!(stddev(&[], Some(4.0)), 0.0);
    }

    #[test]
    fn population_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < EPS);
        assert!((stddev(&values, None) - 2.0).abs() < EPS);
        assert!((stddev(&values, Some(5.0)) - 2.0).abs() < EPS);
    }

    #[test]
    fn constant_list_has_no_deviation() {
        let values = [3.0, 3.0, 3.0];
        assert_eq!(stddev(&values, None), 0.0);
        assert_eq!(z_score(3.0, 3.0, 0.0), 0.0);
        assert_eq!(z_score(10.0, 3.0, 0.0), 0.0);
    }

    #[test]
    fn z_score_scales_by_deviation() {
        assert!((z_score(9.0, 5.0, 2.0) - 2.0).abs() < EPS);
        assert!((z_score(1.0, 5.0, 2.0) + 2.0).abs() < EPS);
    }

    #[test]
    fn normalize_z_is_bounded() {
        assert!((normalize_z(0.0) - 50.0).abs() < EPS);
        assert!((normalize_z(3.0) - 100.0).abs() < EPS);
        assert!((normalize_z(-3.0)).abs() < EPS);
        assert!((normalize_z(12.0) - 100.0).abs() < EPS);
        assert!((normalize_z(-7.5)).abs() < EPS);
        assert!((normalize_z(1.5) - 75.0).abs() < EPS);
    }
}
