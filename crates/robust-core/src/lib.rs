//! Core types for robust control-chart computations
//!
//! This crate provides the pieces shared across the robust-charts workspace:
//!
//! - [`Error`] / [`Result`]: the unified error type
//! - [`shape`]: operand shape and value checks for matrix routines
//! - [`utils`]: mean, standard deviation and quantiles of slices
//!
//! # Example
//!
//! ```rust
//! use robust_core::{shape::ensure_len, utils::quantile};
//!
//! assert!(ensure_len(3, 3, "threshold vector").is_ok());
//! let q = quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.5).unwrap();
//! assert_eq!(q, 3.0);
//! ```

pub mod error;
pub mod shape;
pub mod utils;

pub use error::{Error, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::shape::{ensure_finite, ensure_len, ensure_positive, ensure_shape};
    pub use crate::Result;
}
