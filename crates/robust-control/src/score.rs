//! Cell-wise score functions for adaptive EWMA residuals

use crate::types::{validate_lambda, ScoreFunction};
use nalgebra::{DMatrix, DVector};
use robust_core::{shape, Error, Result};

/// Score every cell of a residual matrix
///
/// `k` holds the threshold of each cell. It is either the same shape as `e`
/// or a single row, in which case that row is used for every row of `e`.
///
/// The `huber` flag selects [`ScoreFunction::Huber`]; otherwise the Tukey
/// bisquare score is used.
pub fn score(e: &DMatrix<f64>, lambda: f64, k: &DMatrix<f64>, huber: bool) -> Result<DMatrix<f64>> {
    validate_lambda(lambda)?;
    let score_fn = ScoreFunction::from_huber_flag(huber);
    let (n, p) = e.shape();

    let broadcast = match k.shape() {
        dims if dims == (n, p) => false,
        (1, cols) if cols == p => true,
        other => return Err(Error::shape_mismatch((n, p), other, "score thresholds")),
    };
    crate::types::validate_thresholds(k.iter())?;

    Ok(DMatrix::from_fn(n, p, |i, j| {
        let kij = if broadcast { k[(0, j)] } else { k[(i, j)] };
        score_fn.apply(e[(i, j)], lambda, kij)
    }))
}

/// Score every element of a residual vector
///
/// Vector counterpart of [`score`]; `k` must have the same length as `e`.
pub fn score2(e: &DVector<f64>, lambda: f64, k: &DVector<f64>, huber: bool) -> Result<DVector<f64>> {
    validate_lambda(lambda)?;
    shape::ensure_len(k.len(), e.len(), "score thresholds")?;
    crate::types::validate_thresholds(k.iter())?;
    Ok(apply_scores(e, lambda, k, ScoreFunction::from_huber_flag(huber)))
}

/// Unchecked element-wise scoring used by the recursion once the
/// parameters have been validated
pub(crate) fn apply_scores(
    e: &DVector<f64>,
    lambda: f64,
    k: &DVector<f64>,
    score_fn: ScoreFunction,
) -> DVector<f64> {
    e.zip_map(k, |ei, ki| score_fn.apply(ei, lambda, ki))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_score_matches_cellwise_function() {
        let e = DMatrix::from_row_slice(2, 2, &[0.5, -3.0, 4.0, -0.1]);
        let k = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 2.0, 2.0]);
        let out = score(&e, 0.25, &k, true).unwrap();

        assert_relative_eq!(out[(0, 0)], 0.125);
        assert_relative_eq!(out[(0, 1)], -3.0 + 0.75);
        assert_relative_eq!(out[(1, 0)], 4.0 - 1.5);
        assert_relative_eq!(out[(1, 1)], -0.025);
    }

    #[test]
    fn test_score_broadcasts_single_row() {
        let e = DMatrix::from_row_slice(3, 2, &[1.0, 5.0, -1.0, -5.0, 0.0, 2.0]);
        let k_row = DMatrix::from_row_slice(1, 2, &[2.0, 3.0]);
        let k_full = DMatrix::from_row_slice(3, 2, &[2.0, 3.0, 2.0, 3.0, 2.0, 3.0]);

        let a = score(&e, 0.4, &k_row, false).unwrap();
        let b = score(&e, 0.4, &k_full, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_rejects_bad_shape() {
        let e = DMatrix::<f64>::zeros(3, 2);
        let k = DMatrix::from_element(2, 2, 1.0);
        assert!(matches!(
            score(&e, 0.5, &k, true),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_score_does_not_mutate_inputs() {
        let e = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);
        let k = DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]);
        let (e0, k0) = (e.clone(), k.clone());
        let _ = score(&e, 0.3, &k, false).unwrap();
        assert_eq!(e, e0);
        assert_eq!(k, k0);
    }

    #[test]
    fn test_score2_matches_score() {
        let e = DVector::from_vec(vec![0.3, -2.5, 7.0]);
        let k = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let vec_out = score2(&e, 0.1, &k, false).unwrap();

        let e_row = DMatrix::from_row_slice(1, 3, e.as_slice());
        let k_row = DMatrix::from_row_slice(1, 3, k.as_slice());
        let mat_out = score(&e_row, 0.1, &k_row, false).unwrap();

        for j in 0..3 {
            assert_relative_eq!(vec_out[j], mat_out[(0, j)]);
        }
    }

    #[test]
    fn test_score2_validates() {
        let e = DVector::from_vec(vec![1.0, 2.0]);
        let k = DVector::from_vec(vec![1.0]);
        assert!(score2(&e, 0.5, &k, true).is_err());

        let k = DVector::from_vec(vec![1.0, 0.0]);
        assert!(score2(&e, 0.5, &k, true).is_err());
        let k = DVector::from_vec(vec![1.0, 1.0]);
        assert!(score2(&e, 0.0, &k, true).is_err());
    }
}
