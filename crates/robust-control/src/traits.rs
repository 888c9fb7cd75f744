//! Core traits for control-chart monitoring

use nalgebra::DVector;
use robust_core::Result;

/// Properties of a control chart that don't depend on the data
pub trait ChartProperties {
    /// Get the name of the monitoring statistic
    fn algorithm_name(&self) -> &'static str;

    /// Number of monitored variables
    fn dimension(&self) -> usize;

    /// Control limit on the charted statistic
    fn control_limit(&self) -> f64;
}

/// A single charted point
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Position in the stream, starting at 0
    pub index: usize,
    /// Charted statistic
    pub statistic: f64,
    /// Whether the statistic exceeds the control limit
    pub signal: bool,
}

/// Online monitoring, one observation at a time
pub trait OnlineMonitor {
    /// Process a single observation and return its charted point
    fn process(&mut self, observation: &DVector<f64>) -> Result<ChartPoint>;

    /// Reset internal state
    fn reset(&mut self);

    /// Get current position in stream
    fn current_index(&self) -> usize;

    /// Process observations until the first signal
    ///
    /// Returns the 1-based run length, or `None` if the stream ends first.
    fn run_until_signal<'a, I>(&mut self, observations: I) -> Result<Option<usize>>
    where
        I: IntoIterator<Item = &'a DVector<f64>>,
    {
        for (position, observation) in observations.into_iter().enumerate() {
            if self.process(observation)?.signal {
                return Ok(Some(position + 1));
            }
        }
        Ok(None)
    }
}
