//! Monte Carlo run-length simulation
//!
//! Synthetic sequences are drawn by resampling in-control rows with
//! replacement. An optional mean shift is added to the monitored part of
//! each sequence, which gives out-of-control run lengths; without a shift
//! the simulation estimates the in-control ARL.

use crate::kernel::EwmaKernel;
use crate::run_length::{monitor_sequence, validate_limit, SequenceOutcome};
use crate::t2::EigenModel;
use crate::types::{RunLength, RunLengthResult};
use nalgebra::{DMatrix, DVector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robust_core::{shape, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Settings of a run-length simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated sequences
    pub replicates: usize,
    /// Unshifted rows used to warm up each sequence
    pub warmup: usize,
    /// Maximum number of monitored rows per sequence (runs are censored there)
    pub max_length: usize,
    /// Mean shift added to every monitored row
    pub shift: Option<Vec<f64>>,
    /// Seed for reproducible draws
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            replicates: 1000,
            warmup: 0,
            max_length: 500,
            shift: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Set the number of replicates
    pub fn with_replicates(mut self, replicates: usize) -> Self {
        self.replicates = replicates;
        self
    }

    /// Set the warm-up length
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Set the censoring length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Add a mean shift to the monitored rows
    pub fn with_shift(mut self, shift: Vec<f64>) -> Self {
        self.shift = Some(shift);
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self, dimension: usize) -> Result<()> {
        if self.replicates == 0 {
            return Err(Error::InvalidParameter("replicates must be positive".to_string()));
        }
        if self.max_length == 0 {
            return Err(Error::InvalidParameter("max_length must be positive".to_string()));
        }
        if let Some(shift) = &self.shift {
            shape::ensure_len(shift.len(), dimension, "mean shift")?;
        }
        Ok(())
    }
}

/// One synthetic sequence: warm-up rows and monitored rows
struct Replicate {
    warmup: DMatrix<f64>,
    monitored: DMatrix<f64>,
}

fn draw_rows<R: Rng>(reference: &DMatrix<f64>, count: usize, rng: &mut R) -> DMatrix<f64> {
    let n = reference.nrows();
    let mut out = DMatrix::zeros(count, reference.ncols());
    for r in 0..count {
        out.set_row(r, &reference.row(rng.gen_range(0..n)));
    }
    out
}

/// Simulate run lengths of the chart on resampled in-control data
///
/// Every replicate uses its own `ChaCha8Rng` seeded from the base seed and
/// the replicate index, so results are reproducible and do not depend on
/// the `parallel` feature.
#[instrument(skip(x_ic, kernel, model), fields(ic_rows = x_ic.nrows()))]
pub fn simulate_run_lengths(
    x_ic: &DMatrix<f64>,
    kernel: &EwmaKernel,
    model: &EigenModel,
    limit: f64,
    config: &SimulationConfig,
) -> Result<RunLengthResult> {
    validate_limit(limit)?;
    let p = kernel.dimension();
    config.validate(p)?;
    shape::ensure_len(x_ic.ncols(), p, "in-control columns")?;
    shape::ensure_len(model.dimension(), p, "eigenvector rows")?;
    if x_ic.nrows() == 0 {
        return Err(Error::empty_input("in-control reference"));
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let shift = config.shift.as_ref().map(|s| DVector::from_column_slice(s));
    debug!(
        "Simulating {} sequences of up to {} rows (seed {})",
        config.replicates, config.max_length, base_seed
    );

    let replicates: Vec<Replicate> = (0..config.replicates)
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
            let warmup = draw_rows(x_ic, config.warmup, &mut rng);
            let mut monitored = draw_rows(x_ic, config.max_length, &mut rng);
            if let Some(delta) = &shift {
                let delta = delta.transpose();
                for mut row in monitored.row_iter_mut() {
                    row += &delta;
                }
            }
            Replicate { warmup, monitored }
        })
        .collect();

    let warmup_rows: Vec<usize> = (0..config.warmup).collect();
    let rows: Vec<usize> = (0..config.max_length).collect();
    let evaluate = |rep: &Replicate| {
        monitor_sequence(kernel, model, limit, &rep.warmup, &warmup_rows, &rep.monitored, &rows)
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<SequenceOutcome> = replicates.par_iter().map(evaluate).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<SequenceOutcome> = replicates.iter().map(evaluate).collect();

    let mut t2 = Vec::with_capacity(config.replicates * config.max_length);
    let runs = outcomes
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| {
            t2.extend(outcome.t2);
            RunLength {
                group: (i + 1) as f64,
                length: outcome.length,
                signaled: outcome.signaled,
            }
        })
        .collect();

    Ok(RunLengthResult::new(runs, t2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoreFunction;
    use rand_distr::{Distribution, StandardNormal};

    fn normal_reference(n: usize, p: usize, seed: u64) -> DMatrix<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        DMatrix::from_fn(n, p, |_, _| StandardNormal.sample(&mut rng))
    }

    fn setup() -> (DMatrix<f64>, EwmaKernel, EigenModel) {
        let x_ic = normal_reference(400, 2, 11);
        let kernel = EwmaKernel::new(0.2, DVector::from_element(2, 3.0), ScoreFunction::Huber).unwrap();
        // Asymptotic covariance of the EWMA of unit-variance data: lambda / (2 - lambda)
        let model = EigenModel::new(
            DVector::from_element(2, 0.2 / 1.8),
            DMatrix::identity(2, 2),
        )
        .unwrap();
        (x_ic, kernel, model)
    }

    #[test]
    fn test_reproducible_with_seed() {
        let (x_ic, kernel, model) = setup();
        let config = SimulationConfig::default()
            .with_replicates(20)
            .with_max_length(50)
            .with_seed(42);
        let a = simulate_run_lengths(&x_ic, &kernel, &model, 10.0, &config).unwrap();
        let b = simulate_run_lengths(&x_ic, &kernel, &model, 10.0, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.runs().len(), 20);
        assert_eq!(a.t2().len(), 20 * 50);
    }

    #[test]
    fn test_shift_shortens_run_length() {
        let (x_ic, kernel, model) = setup();
        let base = SimulationConfig::default()
            .with_replicates(50)
            .with_warmup(20)
            .with_max_length(200)
            .with_seed(7);
        let in_control = simulate_run_lengths(&x_ic, &kernel, &model, 10.6, &base).unwrap();
        let shifted = simulate_run_lengths(&x_ic, &kernel, &model, 10.6, &base.clone().with_shift(vec![3.0, 3.0]))
            .unwrap();

        assert!(shifted.summary().arl < in_control.summary().arl);
        assert_eq!(shifted.signal_count(), 50);
    }

    #[test]
    fn test_config_validation() {
        let (x_ic, kernel, model) = setup();
        let zero = SimulationConfig::default().with_replicates(0);
        assert!(simulate_run_lengths(&x_ic, &kernel, &model, 10.0, &zero).is_err());

        let bad_shift = SimulationConfig::default().with_shift(vec![1.0]);
        assert!(simulate_run_lengths(&x_ic, &kernel, &model, 10.0, &bad_shift).is_err());

        let empty = DMatrix::<f64>::zeros(0, 2);
        assert!(simulate_run_lengths(&empty, &kernel, &model, 10.0, &SimulationConfig::default()).is_err());
    }
}
