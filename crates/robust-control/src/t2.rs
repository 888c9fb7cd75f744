//! Hotelling T² by projection onto an eigen-decomposition
//!
//! Given eigenpairs `(λ_j, v_j)` of the in-control covariance of the
//! monitoring statistic, the T² of an observation `y` is
//!
//! ```text
//! T² = Σ_j (v_jᵀ y)² / λ_j
//! ```
//!
//! Keeping only the leading eigenpairs gives the T² of the principal
//! subspace.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use robust_core::{shape, Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::debug;

/// Check that `vectors` (p x q) and `values` (q) describe q eigenpairs in
/// dimension `dimension`
fn check_eigenpairs(dimension: usize, vectors: &DMatrix<f64>, values: &DVector<f64>) -> Result<()> {
    shape::ensure_shape(vectors, dimension, values.len(), "eigenvectors")?;
    shape::ensure_positive(values, "eigenvalues")
}

#[inline]
fn t2_unchecked(y: &DVector<f64>, vectors: &DMatrix<f64>, values: &DVector<f64>) -> f64 {
    let scores = vectors.tr_mul(y);
    scores
        .iter()
        .zip(values.iter())
        .map(|(s, l)| s * s / l)
        .sum()
}

/// T² of a single observation
pub fn calculate_t2(y: &DVector<f64>, vectors: &DMatrix<f64>, values: &DVector<f64>) -> Result<f64> {
    check_eigenpairs(y.len(), vectors, values)?;
    Ok(t2_unchecked(y, vectors, values))
}

/// T² of every row of `y`
pub fn calculate_t2_vec(
    y: &DMatrix<f64>,
    vectors: &DMatrix<f64>,
    values: &DVector<f64>,
) -> Result<DVector<f64>> {
    check_eigenpairs(y.ncols(), vectors, values)?;
    // Row-wise projection: (n x p) * (p x q)
    let scores = y * vectors;
    Ok(DVector::from_fn(y.nrows(), |i, _| {
        scores
            .row(i)
            .iter()
            .zip(values.iter())
            .map(|(s, l)| s * s / l)
            .sum()
    }))
}

/// Eigen-decomposition of an in-control covariance, used to compute T²
#[derive(Debug, Clone, PartialEq)]
pub struct EigenModel {
    values: DVector<f64>,
    vectors: DMatrix<f64>,
}

impl EigenModel {
    /// Wrap existing eigenpairs
    pub fn new(values: DVector<f64>, vectors: DMatrix<f64>) -> Result<Self> {
        check_eigenpairs(vectors.nrows(), &vectors, &values)?;
        Ok(Self { values, vectors })
    }

    /// Fit the model from in-control rows (observations x variables)
    ///
    /// Eigenpairs are sorted by decreasing eigenvalue. With
    /// `n_components = None` every eigenpair with a numerically positive
    /// eigenvalue is kept.
    pub fn fit(data: &DMatrix<f64>, n_components: Option<usize>) -> Result<Self> {
        let n = data.nrows();
        if n < 2 {
            return Err(Error::InsufficientData { expected: 2, actual: n });
        }
        let covariance = sample_covariance(data);
        Self::from_covariance(&covariance, n_components)
    }

    /// Decompose a symmetric covariance matrix
    pub fn from_covariance(covariance: &DMatrix<f64>, n_components: Option<usize>) -> Result<Self> {
        let p = covariance.nrows();
        shape::ensure_shape(covariance, p, p, "covariance")?;
        if p == 0 {
            return Err(Error::empty_input("covariance"));
        }
        if covariance.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("covariance"));
        }

        let eigen = SymmetricEigen::new(covariance.clone());
        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let largest = eigen.eigenvalues[order[0]];
        let tolerance = largest.abs().max(f64::MIN_POSITIVE) * 1e-12;
        let positive = order
            .iter()
            .take_while(|&&j| eigen.eigenvalues[j] > tolerance)
            .count();

        let q = match n_components {
            Some(q) if q == 0 || q > positive => {
                return Err(Error::InvalidParameter(format!(
                    "requested {q} components, covariance has {positive} positive eigenvalues"
                )))
            }
            Some(q) => q,
            None if positive == 0 => {
                return Err(Error::Computation("covariance is numerically zero".to_string()))
            }
            None => positive,
        };
        debug!("Keeping {} of {} eigenpairs", q, p);

        let values = DVector::from_iterator(q, order[..q].iter().map(|&j| eigen.eigenvalues[j]));
        let vectors = DMatrix::from_fn(p, q, |i, c| eigen.eigenvectors[(i, order[c])]);
        Ok(Self { values, vectors })
    }

    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    pub fn vectors(&self) -> &DMatrix<f64> {
        &self.vectors
    }

    /// Dimension of the observations
    pub fn dimension(&self) -> usize {
        self.vectors.nrows()
    }

    /// Number of retained eigenpairs
    pub fn components(&self) -> usize {
        self.values.len()
    }

    /// Share of total variance carried by the retained eigenpairs, given the
    /// total variance (trace of the covariance)
    pub fn explained_variance(&self, total_variance: f64) -> f64 {
        self.values.sum() / total_variance
    }

    /// T² of one observation
    pub fn t2(&self, y: &DVector<f64>) -> Result<f64> {
        calculate_t2(y, &self.vectors, &self.values)
    }

    /// T² of every row
    pub fn t2_rows(&self, y: &DMatrix<f64>) -> Result<DVector<f64>> {
        calculate_t2_vec(y, &self.vectors, &self.values)
    }

    #[inline]
    pub(crate) fn t2_unchecked(&self, y: &DVector<f64>) -> f64 {
        t2_unchecked(y, &self.vectors, &self.values)
    }
}

/// Unbiased sample covariance of the columns of `data`
pub fn sample_covariance(data: &DMatrix<f64>) -> DMatrix<f64> {
    let n = data.nrows();
    let means = data.row_mean();
    let mut centered = data.clone();
    for mut row in centered.row_iter_mut() {
        row -= &means;
    }
    centered.tr_mul(&centered) / (n as f64 - 1.0)
}

/// Asymptotic control limit for T² with `components` degrees of freedom at
/// false-alarm probability `alpha`
pub fn chi_squared_limit(components: usize, alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "alpha must lie in (0, 1), got {alpha}"
        )));
    }
    let dist = ChiSquared::new(components as f64)
        .map_err(|e| Error::InvalidParameter(format!("chi-squared degrees of freedom: {e}")))?;
    Ok(dist.inverse_cdf(1.0 - alpha))
}
