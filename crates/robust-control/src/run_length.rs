//! Run-length evaluation against an in-control reference
//!
//! Each phase-II group is monitored as its own sequence. The statistic is
//! first warmed up on the in-control rows carrying the same label, then run
//! through the phase-II rows; the run length is the position of the first
//! phase-II row whose T² exceeds the control limit.

use crate::groups::rows_by_label;
use crate::kernel::EwmaKernel;
use crate::t2::EigenModel;
use crate::types::{RunLength, RunLengthResult, ScoreFunction};
use nalgebra::{DMatrix, DVector};
use robust_core::{shape, Error, Result};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of monitoring one sequence
#[derive(Debug, Clone)]
pub(crate) struct SequenceOutcome {
    pub length: usize,
    pub signaled: bool,
    pub t2: Vec<f64>,
}

/// Warm up on `warmup_rows` of `warmup`, then monitor `rows` of `x`
pub(crate) fn monitor_sequence(
    kernel: &EwmaKernel,
    model: &EigenModel,
    limit: f64,
    warmup: &DMatrix<f64>,
    warmup_rows: &[usize],
    x: &DMatrix<f64>,
    rows: &[usize],
) -> SequenceOutcome {
    let start = kernel
        .run_rows(warmup, warmup_rows.iter().copied(), kernel.initial())
        .pop()
        .unwrap_or_else(|| kernel.initial());

    let mut current = start;
    let mut first_signal = None;
    let mut t2 = Vec::with_capacity(rows.len());
    for (position, &i) in rows.iter().enumerate() {
        current = kernel.step_row(&current, &x.row(i).into_owned());
        let value = model.t2_unchecked(&current);
        if first_signal.is_none() && value > limit {
            first_signal = Some(position + 1);
        }
        t2.push(value);
    }

    SequenceOutcome {
        length: first_signal.unwrap_or(rows.len()),
        signaled: first_signal.is_some(),
        t2,
    }
}

pub(crate) fn validate_limit(limit: f64) -> Result<()> {
    if !limit.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "control limit must be finite, got {limit}"
        )));
    }
    Ok(())
}

/// Run length of every phase-II group
///
/// * `x2`, `idx2` - phase-II observations and their group labels
/// * `x_ic`, `idx_ic` - in-control observations used to warm up the
///   statistic of the group with the same label (a group may have none)
/// * `lambda`, `k`, `huber` - EWMA parameters
/// * `h` - control limit on T²
/// * `values`, `vectors` - eigenpairs used for T²
///
/// Groups are reported in order of first appearance in `idx2`. A group that
/// never signals gets its number of phase-II rows as run length and is
/// marked as not signaled. Warm-up rows are never monitored.
#[allow(clippy::too_many_arguments)]
#[instrument(skip_all, fields(phase2_rows = x2.nrows(), ic_rows = x_ic.nrows(), h = h))]
pub fn get_run_length(
    x2: &DMatrix<f64>,
    x_ic: &DMatrix<f64>,
    idx2: &DVector<f64>,
    idx_ic: &DVector<f64>,
    lambda: f64,
    k: &DVector<f64>,
    huber: bool,
    h: f64,
    values: &DVector<f64>,
    vectors: &DMatrix<f64>,
) -> Result<RunLengthResult> {
    let kernel = EwmaKernel::new(lambda, k.clone(), ScoreFunction::from_huber_flag(huber))?;
    let model = EigenModel::new(values.clone(), vectors.clone())?;
    run_length_with(&kernel, &model, h, x2, idx2, x_ic, idx_ic)
}

/// [`get_run_length`] with a prepared kernel and eigen model
pub fn run_length_with(
    kernel: &EwmaKernel,
    model: &EigenModel,
    h: f64,
    x2: &DMatrix<f64>,
    idx2: &DVector<f64>,
    x_ic: &DMatrix<f64>,
    idx_ic: &DVector<f64>,
) -> Result<RunLengthResult> {
    validate_limit(h)?;
    let p = kernel.dimension();
    shape::ensure_len(x2.ncols(), p, "phase-II columns")?;
    shape::ensure_len(x_ic.ncols(), p, "in-control columns")?;
    shape::ensure_len(model.dimension(), p, "eigenvector rows")?;
    shape::ensure_len(idx2.len(), x2.nrows(), "phase-II group labels")?;
    shape::ensure_len(idx_ic.len(), x_ic.nrows(), "in-control group labels")?;

    let groups = rows_by_label(idx2)?;
    let ic_groups = rows_by_label(idx_ic)?;
    debug!("Monitoring {} phase-II sequences", groups.len());

    let evaluate = |(label, rows): &(f64, Vec<usize>)| {
        let warmup: &[usize] = ic_groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, r)| r.as_slice())
            .unwrap_or(&[]);
        monitor_sequence(kernel, model, h, x_ic, warmup, x2, rows)
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<SequenceOutcome> = groups.par_iter().map(evaluate).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<SequenceOutcome> = groups.iter().map(evaluate).collect();

    let mut t2 = vec![0.0; x2.nrows()];
    let mut runs = Vec::with_capacity(groups.len());
    for ((label, rows), outcome) in groups.iter().zip(outcomes) {
        for (&i, value) in rows.iter().zip(&outcome.t2) {
            t2[i] = *value;
        }
        runs.push(RunLength {
            group: *label,
            length: outcome.length,
            signaled: outcome.signaled,
        });
    }

    Ok(RunLengthResult::new(runs, t2))
}
