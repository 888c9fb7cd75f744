//! Types used for control-chart monitoring

use robust_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score function applied to EWMA residuals
///
/// Both functions are parameterized by the smoothing constant `lambda` and a
/// threshold `k`. Residuals larger than `k` are followed more closely than a
/// plain EWMA would, so large shifts are tracked quickly while small ones are
/// still smoothed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFunction {
    /// Huber score: linear with slope `lambda` inside `[-k, k]`, unit slope outside
    #[default]
    Huber,
    /// Tukey bisquare score: smooth transition that reaches the identity at `|e| = k`
    Tukey,
}

impl ScoreFunction {
    /// Map the boolean `huber` flag used at the call boundary
    pub fn from_huber_flag(huber: bool) -> Self {
        if huber {
            Self::Huber
        } else {
            Self::Tukey
        }
    }

    /// Whether this is the Huber score
    pub fn is_huber(&self) -> bool {
        matches!(self, Self::Huber)
    }

    /// Evaluate the score of a single residual
    #[inline]
    pub fn apply(&self, e: f64, lambda: f64, k: f64) -> f64 {
        match self {
            Self::Huber => {
                if e > k {
                    e - (1.0 - lambda) * k
                } else if e < -k {
                    e + (1.0 - lambda) * k
                } else {
                    lambda * e
                }
            }
            Self::Tukey => {
                if e.abs() <= k {
                    let r = e / k;
                    let w = 1.0 - r * r;
                    e * (1.0 - (1.0 - lambda) * w * w)
                } else {
                    e
                }
            }
        }
    }
}

impl fmt::Display for ScoreFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreFunction::Huber => write!(f, "Huber"),
            ScoreFunction::Tukey => write!(f, "Tukey"),
        }
    }
}

/// Validate a smoothing constant
pub fn validate_lambda(lambda: f64) -> Result<()> {
    if !(lambda > 0.0 && lambda <= 1.0) {
        return Err(Error::InvalidParameter(format!(
            "lambda must lie in (0, 1], got {lambda}"
        )));
    }
    Ok(())
}

/// Validate score thresholds
pub fn validate_thresholds<'a>(k: impl IntoIterator<Item = &'a f64>) -> Result<()> {
    for &value in k {
        if !(value > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "score threshold k must be strictly positive, got {value}"
            )));
        }
    }
    Ok(())
}

/// Parameters of the adaptive EWMA statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartParameters {
    /// Smoothing constant (0 < lambda <= 1)
    pub lambda: f64,
    /// Per-variable score thresholds
    pub k: Vec<f64>,
    /// Score function
    pub score: ScoreFunction,
}

impl ChartParameters {
    /// Create parameters for `dimension` variables sharing one threshold
    pub fn uniform(dimension: usize, lambda: f64, k: f64, score: ScoreFunction) -> Self {
        Self {
            lambda,
            k: vec![k; dimension],
            score,
        }
    }

    /// Number of monitored variables
    pub fn dimension(&self) -> usize {
        self.k.len()
    }

    /// Check `lambda` and `k`
    pub fn validate(&self) -> Result<()> {
        validate_lambda(self.lambda)?;
        if self.k.is_empty() {
            return Err(Error::empty_input("score thresholds"));
        }
        validate_thresholds(&self.k)
    }
}

impl Default for ChartParameters {
    fn default() -> Self {
        Self {
            lambda: 0.2,
            k: vec![3.0],
            score: ScoreFunction::Huber,
        }
    }
}

/// Run length of a single monitored sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunLength {
    /// Group label of the sequence
    pub group: f64,
    /// 1-based position of the first signal, or the sequence length if none
    pub length: usize,
    /// Whether the chart signaled inside the sequence
    pub signaled: bool,
}

/// Result of a run-length evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct RunLengthResult {
    runs: Vec<RunLength>,
    t2: Vec<f64>,
}

impl RunLengthResult {
    /// Create a new run-length result
    pub fn new(runs: Vec<RunLength>, t2: Vec<f64>) -> Self {
        Self { runs, t2 }
    }

    /// Per-sequence run lengths, in order of first appearance of each group
    pub fn runs(&self) -> &[RunLength] {
        &self.runs
    }

    /// T² of every monitored (phase-II) row, in input row order
    pub fn t2(&self) -> &[f64] {
        &self.t2
    }

    /// Run lengths as plain numbers
    pub fn lengths(&self) -> Vec<usize> {
        self.runs.iter().map(|r| r.length).collect()
    }

    /// Number of sequences that signaled
    pub fn signal_count(&self) -> usize {
        self.runs.iter().filter(|r| r.signaled).count()
    }

    /// Summary statistics of the run-length distribution
    pub fn summary(&self) -> RunLengthSummary {
        let lengths: Vec<f64> = self.runs.iter().map(|r| r.length as f64).collect();
        RunLengthSummary {
            sequences: lengths.len(),
            arl: robust_core::utils::mean(&lengths),
            sdrl: robust_core::utils::std_dev(&lengths),
            censored: lengths.len() - self.signal_count(),
        }
    }
}

impl fmt::Display for RunLengthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Length Result:")?;
        writeln!(f, "  Sequences: {}", self.runs.len())?;
        writeln!(f, "  Signaled: {}", self.signal_count())?;
        for run in &self.runs {
            let mark = if run.signaled { "" } else { " (censored)" };
            writeln!(f, "    group {}: {}{}", run.group, run.length, mark)?;
        }
        Ok(())
    }
}

/// Summary of a run-length distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunLengthSummary {
    /// Number of sequences
    pub sequences: usize,
    /// Average run length
    pub arl: f64,
    /// Standard deviation of the run length
    pub sdrl: f64,
    /// Sequences that never signaled
    pub censored: usize,
}
