//! Adaptive EWMA statistic
//!
//! The statistic follows each observation through a score function:
//!
//! ```text
//! Y_t = Y_{t-1} + ψ(X_t - Y_{t-1}),   Y_0 = 0
//! ```
//!
//! With the Huber score, residuals inside `[-k, k]` give the classical EWMA
//! update while larger residuals move the statistic almost all the way to the
//! new observation.

use crate::groups::consecutive_segments;
use crate::kernel::EwmaKernel;
use crate::types::ScoreFunction;
use nalgebra::{DMatrix, DVector};
use robust_core::{shape, Result};
use tracing::{debug, instrument};

/// One step of the adaptive EWMA recursion
///
/// Returns a vector of the same length as `x`.
pub fn statistic_y_ewma_vec(
    x: &DVector<f64>,
    y_previous: &DVector<f64>,
    lambda: f64,
    k: &DVector<f64>,
    huber: bool,
) -> Result<DVector<f64>> {
    let kernel = EwmaKernel::new(lambda, k.clone(), ScoreFunction::from_huber_flag(huber))?;
    kernel.step(y_previous, x)
}

/// Adaptive EWMA statistic of every row of `x`
///
/// `idx` carries a group label per row. The recursion restarts from the
/// zero vector at the first row and whenever the label changes from one row
/// to the next, so each run of rows sharing a label is an independent
/// sequence. The output has the same shape as `x`.
#[instrument(skip(x, k, idx), fields(rows = x.nrows(), cols = x.ncols()))]
pub fn statistic_y_ewma(
    x: &DMatrix<f64>,
    lambda: f64,
    k: &DVector<f64>,
    huber: bool,
    idx: &DVector<f64>,
) -> Result<DMatrix<f64>> {
    let kernel = EwmaKernel::new(lambda, k.clone(), ScoreFunction::from_huber_flag(huber))?;
    shape::ensure_len(x.ncols(), kernel.dimension(), "observation columns")?;
    shape::ensure_len(idx.len(), x.nrows(), "group labels")?;

    let segments = consecutive_segments(idx)?;
    debug!("Running EWMA over {} sequences", segments.len());

    let mut y = DMatrix::zeros(x.nrows(), x.ncols());
    for segment in segments {
        let rows = segment.clone();
        let values = kernel.run_rows(x, segment, kernel.initial());
        for (i, value) in rows.zip(values) {
            y.set_row(i, &value.transpose());
        }
    }
    Ok(y)
}
