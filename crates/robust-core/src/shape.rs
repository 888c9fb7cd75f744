//! Shape and value checks shared by the matrix routines
//!
//! Every routine that combines several operands validates them up front so a
//! mismatch surfaces as an [`Error::DimensionMismatch`] instead of a panic
//! deep inside a linear-algebra call.

use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// Require `actual == expected` for a vector length
pub fn ensure_len(actual: usize, expected: usize, context: &str) -> Result<()> {
    if actual != expected {
        return Err(Error::size_mismatch(expected, actual, context));
    }
    Ok(())
}

/// Require a matrix to have exactly the given shape
pub fn ensure_shape(matrix: &DMatrix<f64>, rows: usize, cols: usize, context: &str) -> Result<()> {
    if matrix.shape() != (rows, cols) {
        return Err(Error::shape_mismatch((rows, cols), matrix.shape(), context));
    }
    Ok(())
}

/// Require every entry of a vector to be finite
pub fn ensure_finite(values: &DVector<f64>, context: &str) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite(context));
    }
    Ok(())
}

/// Require every entry of a vector to be strictly positive
pub fn ensure_positive(values: &DVector<f64>, context: &str) -> Result<()> {
    if let Some(bad) = values.iter().find(|v| !(**v > 0.0)) {
        return Err(Error::InvalidParameter(format!(
            "{context} must be strictly positive, found {bad}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len(3, 3, "k").is_ok());
        let err = ensure_len(2, 3, "k").unwrap_err();
        assert_eq!(err.to_string(), "Dimension mismatch in k: expected 3, got 2");
    }

    #[test]
    fn test_ensure_shape() {
        let m = DMatrix::<f64>::zeros(2, 3);
        assert!(ensure_shape(&m, 2, 3, "m").is_ok());
        assert!(matches!(
            ensure_shape(&m, 3, 2, "m"),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_ensure_finite_and_positive() {
        let ok = DVector::from_vec(vec![1.0, 0.5]);
        assert!(ensure_finite(&ok, "v").is_ok());
        assert!(ensure_positive(&ok, "v").is_ok());

        let nan = DVector::from_vec(vec![1.0, f64::NAN]);
        assert!(ensure_finite(&nan, "v").is_err());
        assert!(ensure_positive(&nan, "v").is_err());

        let zero = DVector::from_vec(vec![1.0, 0.0]);
        assert!(ensure_positive(&zero, "v").is_err());
    }
}
