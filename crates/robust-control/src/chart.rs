//! Adaptive EWMA control chart on Hotelling T²
//!
//! Ties together the EWMA kernel, an eigen model of the in-control
//! statistic, and a control limit. Phase I ([`EwmaChart::fit`]) estimates the
//! model and limit from in-control data; phase II monitors new sequences in
//! batch ([`EwmaChart::monitor`], [`EwmaChart::run_length`]) or online
//! ([`OnlineEwmaMonitor`]).

use crate::calibration::calibrate_limit;
use crate::ewma::statistic_y_ewma;
use crate::kernel::EwmaKernel;
use crate::run_length::{run_length_with, validate_limit};
use crate::simulation::{simulate_run_lengths, SimulationConfig};
use crate::t2::EigenModel;
use crate::traits::{ChartPoint, ChartProperties, OnlineMonitor};
use crate::types::{ChartParameters, RunLengthResult};
use nalgebra::{DMatrix, DVector};
use robust_core::{shape, Result};
use tracing::{debug, instrument};

/// Phase-I settings
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOneOptions {
    /// Eigenpairs to keep (all positive ones when `None`)
    pub n_components: Option<usize>,
    /// In-control false-alarm probability used for the limit
    pub alpha: f64,
}

impl Default for PhaseOneOptions {
    fn default() -> Self {
        Self {
            n_components: None,
            alpha: 0.01,
        }
    }
}

/// Adaptive EWMA chart
#[derive(Debug, Clone)]
pub struct EwmaChart {
    kernel: EwmaKernel,
    model: EigenModel,
    limit: f64,
}

impl EwmaChart {
    /// Assemble a chart from its parts
    pub fn new(params: &ChartParameters, model: EigenModel, limit: f64) -> Result<Self> {
        params.validate()?;
        validate_limit(limit)?;
        let kernel = EwmaKernel::from_parameters(params)?;
        shape::ensure_len(model.dimension(), kernel.dimension(), "eigenvector rows")?;
        Ok(Self { kernel, model, limit })
    }

    /// Phase I: fit the eigen model and calibrate the limit on in-control data
    ///
    /// `idx` groups the rows of `x_ic` into sequences as in
    /// [`statistic_y_ewma`].
    #[instrument(skip(x_ic, idx), fields(rows = x_ic.nrows()))]
    pub fn fit(
        x_ic: &DMatrix<f64>,
        idx: &DVector<f64>,
        params: &ChartParameters,
        options: &PhaseOneOptions,
    ) -> Result<Self> {
        params.validate()?;
        let k = DVector::from_column_slice(&params.k);
        let y = statistic_y_ewma(x_ic, params.lambda, &k, params.score.is_huber(), idx)?;
        let model = EigenModel::fit(&y, options.n_components)?;
        let t2 = model.t2_rows(&y)?;
        let limit = calibrate_limit(t2.as_slice(), options.alpha)?;
        debug!(
            "Phase I fitted: {} components, limit {:.4}",
            model.components(),
            limit
        );
        Self::new(params, model, limit)
    }

    pub fn kernel(&self) -> &EwmaKernel {
        &self.kernel
    }

    pub fn model(&self) -> &EigenModel {
        &self.model
    }

    /// Replace the control limit
    pub fn with_limit(mut self, limit: f64) -> Result<Self> {
        validate_limit(limit)?;
        self.limit = limit;
        Ok(self)
    }

    /// EWMA statistic of every row
    pub fn statistic(&self, x: &DMatrix<f64>, idx: &DVector<f64>) -> Result<DMatrix<f64>> {
        statistic_y_ewma(
            x,
            self.kernel.lambda(),
            self.kernel.thresholds(),
            self.kernel.score_function().is_huber(),
            idx,
        )
    }

    /// T² of a statistic vector
    pub fn t2(&self, y: &DVector<f64>) -> Result<f64> {
        self.model.t2(y)
    }

    /// Chart every row of `x`
    pub fn monitor(&self, x: &DMatrix<f64>, idx: &DVector<f64>) -> Result<Vec<ChartPoint>> {
        let y = self.statistic(x, idx)?;
        let t2 = self.model.t2_rows(&y)?;
        Ok(t2
            .iter()
            .enumerate()
            .map(|(index, &statistic)| ChartPoint {
                index,
                statistic,
                signal: statistic > self.limit,
            })
            .collect())
    }

    /// Run length of each phase-II group, warmed up on in-control rows
    pub fn run_length(
        &self,
        x2: &DMatrix<f64>,
        idx2: &DVector<f64>,
        x_ic: &DMatrix<f64>,
        idx_ic: &DVector<f64>,
    ) -> Result<RunLengthResult> {
        run_length_with(&self.kernel, &self.model, self.limit, x2, idx2, x_ic, idx_ic)
    }

    /// Monte Carlo run lengths on resampled in-control rows
    pub fn simulate(&self, x_ic: &DMatrix<f64>, config: &SimulationConfig) -> Result<RunLengthResult> {
        simulate_run_lengths(x_ic, &self.kernel, &self.model, self.limit, config)
    }

    /// Start an online monitor
    pub fn online(&self) -> OnlineEwmaMonitor {
        OnlineEwmaMonitor::new(self.clone())
    }
}

impl ChartProperties for EwmaChart {
    fn algorithm_name(&self) -> &'static str {
        "AEWMA-T2"
    }

    fn dimension(&self) -> usize {
        self.kernel.dimension()
    }

    fn control_limit(&self) -> f64 {
        self.limit
    }
}

/// Online adaptive EWMA monitor with state
#[derive(Debug, Clone)]
pub struct OnlineEwmaMonitor {
    chart: EwmaChart,
    current: DVector<f64>,
    current_index: usize,
}

impl OnlineEwmaMonitor {
    pub fn new(chart: EwmaChart) -> Self {
        let current = chart.kernel.initial();
        Self {
            chart,
            current,
            current_index: 0,
        }
    }

    /// Current value of the EWMA statistic
    pub fn statistic(&self) -> &DVector<f64> {
        &self.current
    }
}

impl OnlineMonitor for OnlineEwmaMonitor {
    fn process(&mut self, observation: &DVector<f64>) -> Result<ChartPoint> {
        self.current = self.chart.kernel.step(&self.current, observation)?;
        let statistic = self.chart.model.t2(&self.current)?;
        let point = ChartPoint {
            index: self.current_index,
            statistic,
            signal: statistic > self.chart.limit,
        };
        self.current_index += 1;
        Ok(point)
    }

    fn reset(&mut self) {
        self.current = self.chart.kernel.initial();
        self.current_index = 0;
    }

    fn current_index(&self) -> usize {
        self.current_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoreFunction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, StandardNormal};

    fn reference(n: usize, p: usize, seed: u64) -> DMatrix<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        DMatrix::from_fn(n, p, |_, _| StandardNormal.sample(&mut rng))
    }

    fn fitted_chart() -> (EwmaChart, DMatrix<f64>) {
        let x_ic = reference(300, 3, 5);
        let idx = DVector::from_element(300, 1.0);
        let params = ChartParameters::uniform(3, 0.2, 3.0, ScoreFunction::Huber);
        let chart = EwmaChart::fit(&x_ic, &idx, &params, &PhaseOneOptions::default()).unwrap();
        (chart, x_ic)
    }

    #[test]
    fn test_fit_produces_consistent_chart() {
        let (chart, x_ic) = fitted_chart();
        assert_eq!(chart.dimension(), 3);
        assert_eq!(chart.model().components(), 3);
        assert!(chart.control_limit() > 0.0);

        let idx = DVector::from_element(x_ic.nrows(), 1.0);
        let points = chart.monitor(&x_ic, &idx).unwrap();
        let alarms = points.iter().filter(|p| p.signal).count();
        // Limit is the 99% quantile of the same sample
        assert!(alarms <= 3);
    }

    #[test]
    fn test_online_matches_batch() {
        let (chart, x_ic) = fitted_chart();
        let idx = DVector::from_element(x_ic.nrows(), 1.0);
        let batch = chart.monitor(&x_ic, &idx).unwrap();

        let mut online = chart.online();
        for (i, row) in x_ic.row_iter().enumerate().take(25) {
            let point = online.process(&row.transpose()).unwrap();
            assert_eq!(point.index, i);
            approx::assert_relative_eq!(point.statistic, batch[i].statistic, epsilon = 1e-10);
        }
        assert_eq!(online.current_index(), 25);

        online.reset();
        assert_eq!(online.current_index(), 0);
        assert!(online.statistic().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_online_detects_shift() {
        let (chart, _) = fitted_chart();
        let shifted: Vec<DVector<f64>> = (0..100).map(|_| DVector::from_element(3, 2.5)).collect();
        let mut online = chart.online();
        let rl = online.run_until_signal(&shifted).unwrap();
        assert!(matches!(rl, Some(n) if n <= 10));
    }

    #[test]
    fn test_new_rejects_mismatched_model() {
        let params = ChartParameters::uniform(2, 0.2, 3.0, ScoreFunction::Tukey);
        let model = EigenModel::new(DVector::from_element(3, 1.0), DMatrix::identity(3, 3)).unwrap();
        assert!(EwmaChart::new(&params, model, 5.0).is_err());
    }

    #[test]
    fn test_run_length_through_chart() {
        let (chart, x_ic) = fitted_chart();
        let x2 = DMatrix::from_element(40, 3, 2.0);
        let idx2 = DVector::from_element(40, 1.0);
        let idx_ic = DVector::from_element(x_ic.nrows(), 1.0);
        let result = chart.run_length(&x2, &idx2, &x_ic, &idx_ic).unwrap();
        assert_eq!(result.runs().len(), 1);
        assert!(result.runs()[0].signaled);
    }
}
