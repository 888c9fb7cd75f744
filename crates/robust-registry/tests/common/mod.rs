//! Common test utilities for robust-registry tests

use nalgebra::{DMatrix, DVector};
use robust_registry::Value;

/// Install a tracing subscriber once so `RUST_LOG` works in tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Matrix value from row-major data
pub fn matrix(rows: usize, cols: usize, data: &[f64]) -> Value {
    Value::Matrix(DMatrix::from_row_slice(rows, cols, data))
}

/// Vector value
pub fn vector(data: &[f64]) -> Value {
    Value::Vector(DVector::from_column_slice(data))
}

/// Identity eigenpairs in dimension `p`: (Vectors, Values)
pub fn identity_eigen(p: usize) -> (Value, Value) {
    (
        Value::Matrix(DMatrix::identity(p, p)),
        Value::Vector(DVector::from_element(p, 1.0)),
    )
}

/// Extract a vector result
pub fn as_vector(value: &Value) -> DVector<f64> {
    match value {
        Value::Vector(v) => v.clone(),
        other => panic!("expected vector, got {}", other.describe()),
    }
}

/// Extract a matrix result
pub fn as_matrix(value: &Value) -> DMatrix<f64> {
    match value {
        Value::Matrix(m) => m.clone(),
        other => panic!("expected matrix, got {}", other.describe()),
    }
}
