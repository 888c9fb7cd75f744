//! Summary statistics over plain slices
//!
//! Used for run-length summaries (mean, standard deviation) and for the
//! empirical control limit (quantile).

use crate::{Error, Result};

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 denominator), 0.0 below two values
pub fn std_dev(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// `p`-quantile of ascending data, interpolating linearly between the order
/// statistics at positions `floor((n-1)p)` and `ceil((n-1)p)`
///
/// ```rust
/// use robust_core::utils::quantile_sorted;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile_sorted(&data, 0.25).unwrap(), 2.0);
/// ```
pub fn quantile_sorted(ascending: &[f64], p: f64) -> Result<f64> {
    if ascending.is_empty() {
        return Err(Error::empty_input("quantile sample"));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidParameter(format!(
            "quantile level {p} is outside [0, 1]"
        )));
    }

    let position = (ascending.len() - 1) as f64 * p;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let weight = position - below as f64;
    Ok(ascending[below] + weight * (ascending[above] - ascending[below]))
}

/// `p`-quantile of unordered data; NaN values are rejected
pub fn quantile(data: &[f64], p: f64) -> Result<f64> {
    if data.iter().any(|x| x.is_nan()) {
        return Err(Error::non_finite("quantile sample"));
    }
    let mut ascending = data.to_vec();
    ascending.sort_by(f64::total_cmp);
    quantile_sorted(&ascending, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std_dev() {
        let lengths = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean(&lengths), 3.0);
        // Sum of squares 10 over 4 degrees of freedom
        assert_relative_eq!(std_dev(&lengths), 2.5_f64.sqrt());
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[7.0]), 0.0);
    }

    #[test]
    fn test_quantile_interpolates_between_order_statistics() {
        let data = [40.0, 10.0, 30.0, 20.0];
        // Position 1.5 lies halfway between 20 and 30
        assert_relative_eq!(quantile(&data, 0.5).unwrap(), 25.0);
        assert_eq!(quantile(&data, 0.0).unwrap(), 10.0);
        assert_eq!(quantile(&data, 1.0).unwrap(), 40.0);
    }

    #[test]
    fn test_quantile_leaves_input_untouched() {
        let data = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let before = data.clone();
        assert_eq!(quantile(&data, 0.75).unwrap(), 4.0);
        assert_eq!(data, before);
    }

    #[test]
    fn test_quantile_errors() {
        assert!(matches!(quantile(&[], 0.5), Err(Error::EmptyInput(_))));
        assert!(matches!(
            quantile(&[1.0, 2.0], 1.5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            quantile(&[1.0, f64::NAN], 0.5),
            Err(Error::Computation(_))
        ));
    }
}
