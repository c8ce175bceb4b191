use crate::error::{Error, Result};

/// Initial slider position of the dashboard.
pub const DEFAULT_WEIGHT: f64 = 0.6;

/// Exponentially smooths `series` using the training-curve convention:
///
/// ```text
/// last = series[0]
/// s[i] = last * weight + (1 - weight) * series[i]
/// last = s[i]
/// ```
///
/// `weight` is the share given to the running history, so `0.0` returns the
/// series unchanged and values near `1.0` flatten the curve. The first
/// element is always preserved and the output has the input's length.
///
/// # Errors
/// - [`Error::EmptyInput`] if `series` is empty
/// - [`Error::InvalidWeight`] if `weight` is NaN or outside `[0, 1]`
pub fn smooth(series: &[f64], weight: f64) -> Result<Vec<f64>> {
    validate_weight(weight)?;
    let first = *series.first().ok_or(Error::EmptyInput)?;

    // s[0] equals series[0] algebraically; keep it bit-exact.
    let mut smoothed = Vec::with_capacity(series.len());
    smoothed.push(first);
    let mut last = first;
    for &point in &series[1..] {
        // A zero share drops its term outright so an infinite value on the
        // other side cannot turn into `inf * 0 = NaN`.
        let history = if weight == 0.0 { 0.0 } else { last * weight };
        let fresh = if weight == 1.0 { 0.0 } else { (1.0 - weight) * point };
        let value = history + fresh;
        smoothed.push(value);
        last = value;
    }
    Ok(smoothed)
}

/// Rejects NaN and weights outside `[0, 1]`.
pub fn validate_weight(weight: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&weight) {
        Ok(weight)
    } else {
        Err(Error::InvalidWeight(weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round6(v: &[f64]) -> Vec<f64> {
        v.iter().map(|x| (x * 1e6).round() / 1e6).collect()
    }

    #[test]
    fn matches_hand_computed_values() {
        let out = smooth(&[0.1, 0.3, 0.5], 0.6).unwrap();
        assert_eq!(round6(&out), vec![0.1, 0.18, 0.308]);
    }

    #[test]
    fn zero_weight_is_identity() {
        let series = [0.9, 0.1, 0.55, 1e-9, 3.25];
        assert_eq!(smooth(&series, 0.0).unwrap(), series.to_vec());
    }

    #[test]
    fn zero_weight_is_identity_with_non_finite_values() {
        let out = smooth(&[f64::INFINITY, 1.0, 2.0], 0.0).unwrap();
        assert_eq!(out, vec![f64::INFINITY, 1.0, 2.0]);

        let out = smooth(&[0.5, f64::NEG_INFINITY, 0.25], 0.0).unwrap();
        assert_eq!(out, vec![0.5, f64::NEG_INFINITY, 0.25]);
    }

    #[test]
    fn full_weight_ignores_later_infinities() {
        let out = smooth(&[2.0, f64::INFINITY, 3.0], 1.0).unwrap();
        assert_eq!(out, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn full_weight_freezes_on_first_value() {
        let out = smooth(&[2.0, 5.0, -1.0], 1.0).unwrap();
        assert_eq!(out, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn first_element_and_length_preserved() {
        let series: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        for step in 0..=20 {
            let w = step as f64 * 0.05;
            let out = smooth(&series, w).unwrap();
            assert_eq!(out.len(), series.len());
            assert_eq!(out[0], series[0]);
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let series = [0.3, 0.1, 0.4, 0.1, 0.5, 0.9];
        assert_eq!(smooth(&series, 0.35).unwrap(), smooth(&series, 0.35).unwrap());
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(smooth(&[], 0.6), Err(Error::EmptyInput)));
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        assert!(matches!(smooth(&[1.0], 1.5), Err(Error::InvalidWeight(w)) if w == 1.5));
        assert!(matches!(smooth(&[1.0], -0.1), Err(Error::InvalidWeight(_))));
        assert!(matches!(smooth(&[1.0], f64::NAN), Err(Error::InvalidWeight(_))));
    }
}
