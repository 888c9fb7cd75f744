//! Robust multivariate control charts
//!
//! This crate implements an adaptive EWMA control chart on Hotelling T²,
//! with robust (Huber) and bisquare (Tukey) score functions, and the tools
//! to evaluate it by run length.
//!
//! # Routines
//!
//! - [`score`] / [`score2`]: cell-wise score of EWMA residuals
//! - [`statistic_y_ewma_vec`]: one step of the adaptive EWMA recursion
//! - [`statistic_y_ewma`]: the recursion over grouped rows of a matrix
//! - [`calculate_t2`] / [`calculate_t2_vec`]: T² by eigen projection
//! - [`get_run_length`]: run length of phase-II sequences against an
//!   in-control reference
//!
//! # Building blocks
//!
//! - [`EwmaChart`]: phase-I fitting and phase-II monitoring
//! - [`EigenModel`]: eigen-decomposition of the in-control covariance
//! - [`calibrate_limit`]: empirical control limit
//! - [`simulate_run_lengths`]: Monte Carlo ARL by resampling
//!
//! ## Usage
//!
//! ```rust
//! use nalgebra::{DMatrix, DVector};
//! use robust_control::{calculate_t2_vec, statistic_y_ewma};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[0.1, -0.2, 0.3, 0.0, 2.5, 2.8, 2.6, 3.1]);
//! let k = DVector::from_element(2, 1.0);
//! let idx = DVector::from_element(4, 1.0);
//!
//! let y = statistic_y_ewma(&x, 0.2, &k, true, &idx).unwrap();
//! let values = DVector::from_element(2, 0.2 / 1.8);
//! let vectors = DMatrix::identity(2, 2);
//! let t2 = calculate_t2_vec(&y, &vectors, &values).unwrap();
//! assert_eq!(t2.len(), 4);
//! ```

pub mod calibration;
pub mod chart;
pub mod ewma;
pub mod groups;
pub mod kernel;
pub mod run_length;
pub mod score;
pub mod simulation;
pub mod t2;
pub mod traits;
pub mod types;

pub use calibration::{calibrate_limit, exceedance_rate};
pub use chart::{EwmaChart, OnlineEwmaMonitor, PhaseOneOptions};
pub use ewma::{statistic_y_ewma, statistic_y_ewma_vec};
pub use kernel::EwmaKernel;
pub use run_length::{get_run_length, run_length_with};
pub use score::{score, score2};
pub use simulation::{simulate_run_lengths, SimulationConfig};
pub use t2::{calculate_t2, calculate_t2_vec, chi_squared_limit, sample_covariance, EigenModel};
pub use traits::{ChartPoint, ChartProperties, OnlineMonitor};
pub use types::{ChartParameters, RunLength, RunLengthResult, RunLengthSummary, ScoreFunction};
