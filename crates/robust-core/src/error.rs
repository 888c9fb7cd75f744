//! Error type shared by the robust-charts crates
//!
//! Every fallible routine in the workspace returns [`Result`]. Operand shape
//! problems carry the operand name and both shapes so a caller can tell which
//! argument of a routine was wrong.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A chart or routine parameter is outside its domain (λ, k, h, α, ...)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input data violates a precondition other than its shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operand is empty where at least one element is required
    #[error("Empty input: {0} has no elements")]
    EmptyInput(String),

    /// Operand shapes do not agree
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// Too few observations to estimate something
    #[error("Insufficient data: need at least {expected} rows, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical failure (non-finite values, degenerate covariance)
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn empty_input(operand: &str) -> Self {
        Self::EmptyInput(operand.to_string())
    }

    /// Vector length mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::DimensionMismatch {
            context: context.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Matrix shape mismatch, shapes printed as `rows x cols`
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize), context: &str) -> Self {
        Self::DimensionMismatch {
            context: context.to_string(),
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }

    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_messages() {
        let err = Error::InvalidParameter("lambda must lie in (0, 1]".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: lambda must lie in (0, 1]");

        let err = Error::InsufficientData { expected: 2, actual: 1 };
        assert_eq!(err.to_string(), "Insufficient data: need at least 2 rows, got 1");
    }

    #[test]
    fn test_empty_input_names_operand() {
        let err = Error::empty_input("in-control reference");
        assert!(matches!(&err, Error::EmptyInput(name) if name == "in-control reference"));
        assert_eq!(err.to_string(), "Empty input: in-control reference has no elements");
    }

    #[test]
    fn test_mismatch_helpers() {
        let err = Error::size_mismatch(3, 2, "threshold vector");
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in threshold vector: expected 3, got 2"
        );

        let err = Error::shape_mismatch((4, 2), (4, 3), "score thresholds");
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in score thresholds: expected 4x2, got 4x3"
        );
    }

    #[test]
    fn test_non_finite_is_computation_error() {
        let err = Error::non_finite("group labels");
        assert!(matches!(err, Error::Computation(_)));
        assert!(err.to_string().contains("group labels"));
    }

    #[test]
    fn test_anyhow_passthrough() {
        let err: Error = anyhow::anyhow!("eigen solver diverged").into();
        assert!(matches!(err, Error::Other(_)));
        assert!(err.to_string().contains("eigen solver diverged"));
    }
}
