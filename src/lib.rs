//! Robust multivariate control charts
//!
//! Umbrella crate re-exporting the workspace:
//!
//! - [`robust_core`]: error type and shared helpers
//! - [`robust_control`]: adaptive EWMA statistic, Hotelling T², run lengths
//! - [`robust_registry`]: call-by-name surface with value marshalling

pub use robust_control;
pub use robust_core;
pub use robust_registry;

pub use robust_control::{
    calculate_t2, calculate_t2_vec, get_run_length, score, score2, statistic_y_ewma,
    statistic_y_ewma_vec, ChartParameters, EigenModel, EwmaChart, RunLengthResult, ScoreFunction,
};
pub use robust_core::{Error, Result};
