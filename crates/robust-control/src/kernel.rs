//! Adaptive EWMA kernel
//!
//! Holds validated parameters and expresses the recursion
//! `Y_t = Y_{t-1} + ψ(X_t - Y_{t-1})` as vector operations.

use crate::score::apply_scores;
use crate::types::{validate_lambda, validate_thresholds, ChartParameters, ScoreFunction};
use nalgebra::{DMatrix, DVector, RowDVector};
use robust_core::{shape, Error, Result};

/// Kernel for the adaptive EWMA recursion
#[derive(Clone, Debug)]
pub struct EwmaKernel {
    lambda: f64,
    k: DVector<f64>,
    score: ScoreFunction,
}

impl EwmaKernel {
    /// Create a kernel, validating `lambda` and the thresholds
    pub fn new(lambda: f64, k: DVector<f64>, score: ScoreFunction) -> Result<Self> {
        validate_lambda(lambda)?;
        if k.is_empty() {
            return Err(Error::empty_input("score thresholds"));
        }
        validate_thresholds(k.iter())?;
        Ok(Self { lambda, k, score })
    }

    /// Create a kernel from chart parameters
    pub fn from_parameters(params: &ChartParameters) -> Result<Self> {
        Self::new(params.lambda, DVector::from_column_slice(&params.k), params.score)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn thresholds(&self) -> &DVector<f64> {
        &self.k
    }

    pub fn score_function(&self) -> ScoreFunction {
        self.score
    }

    /// Number of variables the kernel was built for
    pub fn dimension(&self) -> usize {
        self.k.len()
    }

    /// Starting value of every sequence
    pub fn initial(&self) -> DVector<f64> {
        DVector::zeros(self.dimension())
    }

    /// One step of the recursion
    pub fn step(&self, previous: &DVector<f64>, x: &DVector<f64>) -> Result<DVector<f64>> {
        shape::ensure_len(x.len(), self.dimension(), "observation")?;
        shape::ensure_len(previous.len(), self.dimension(), "previous statistic")?;
        Ok(self.step_unchecked(previous, x))
    }

    #[inline]
    pub(crate) fn step_unchecked(&self, previous: &DVector<f64>, x: &DVector<f64>) -> DVector<f64> {
        let residual = x - previous;
        previous + apply_scores(&residual, self.lambda, &self.k, self.score)
    }

    /// Step with an observation stored as a matrix row
    #[inline]
    pub(crate) fn step_row(&self, previous: &DVector<f64>, row: &RowDVector<f64>) -> DVector<f64> {
        let x = row.transpose();
        self.step_unchecked(previous, &x)
    }

    /// Run the recursion over every row of `x`, starting from `start`
    ///
    /// Returns the statistic after each row, with the same shape as `x`.
    pub fn run_from(&self, x: &DMatrix<f64>, start: &DVector<f64>) -> Result<DMatrix<f64>> {
        shape::ensure_len(x.ncols(), self.dimension(), "observation columns")?;
        shape::ensure_len(start.len(), self.dimension(), "starting statistic")?;
        let mut y = DMatrix::zeros(x.nrows(), x.ncols());
        for (i, value) in self.run_rows(x, 0..x.nrows(), start.clone()).into_iter().enumerate() {
            y.set_row(i, &value.transpose());
        }
        Ok(y)
    }

    /// Statistic after each of the given rows of `x`
    ///
    /// Callers guarantee `x` has `dimension()` columns and every index is in
    /// range.
    pub(crate) fn run_rows(
        &self,
        x: &DMatrix<f64>,
        rows: impl IntoIterator<Item = usize>,
        start: DVector<f64>,
    ) -> Vec<DVector<f64>> {
        let mut current = start;
        rows.into_iter()
            .map(|i| {
                current = self.step_row(&current, &x.row(i).into_owned());
                current.clone()
            })
            .collect()
    }
}
