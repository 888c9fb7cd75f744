//! Control-limit calibration from in-control T² values

use robust_core::{utils, Error, Result};
use tracing::debug;

/// Empirical control limit: the `1 - alpha` quantile of in-control T² values
///
/// Quantiles interpolate linearly between order statistics.
pub fn calibrate_limit(t2_in_control: &[f64], alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "alpha must lie in (0, 1), got {alpha}"
        )));
    }
    let limit = utils::quantile(t2_in_control, 1.0 - alpha)?;
    debug!(
        "Calibrated limit {:.4} from {} in-control values (alpha = {})",
        limit,
        t2_in_control.len(),
        alpha
    );
    Ok(limit)
}

/// Share of values strictly above the limit
pub fn exceedance_rate(t2: &[f64], limit: f64) -> f64 {
    if t2.is_empty() {
        return 0.0;
    }
    t2.iter().filter(|&&v| v > limit).count() as f64 / t2.len() as f64
}
