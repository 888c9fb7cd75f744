//! Conversions between [`Value`] and typed routine arguments
//!
//! Scalars and length-one containers are interchangeable, a vector converts
//! to a single-column matrix, and a single-row or single-column matrix
//! converts to a vector.

use crate::error::{Error, Result};
use crate::value::Value;
use nalgebra::{DMatrix, DVector};
use robust_control::RunLengthResult;

/// Typed extraction of an argument
pub trait FromValue: Sized {
    /// Convert `value`; `argument` names it in error messages
    fn from_value(value: &Value, argument: &str) -> Result<Self>;
}

/// Wrapping of a routine result
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for f64 {
    fn from_value(value: &Value, argument: &str) -> Result<Self> {
        match value {
            Value::Real(x) => Ok(*x),
            Value::Integer(i) => Ok(*i as f64),
            Value::Vector(v) if v.len() == 1 => Ok(v[0]),
            Value::Matrix(m) if m.len() == 1 => Ok(m[(0, 0)]),
            other => Err(Error::type_mismatch(argument, "numeric scalar", &other.describe())),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value, argument: &str) -> Result<Self> {
        match value {
            Value::Logical(b) => Ok(*b),
            Value::Integer(i) => Ok(*i != 0),
            other => {
                let x = f64::from_value(other, argument)
                    .map_err(|_| Error::type_mismatch(argument, "logical scalar", &other.describe()))?;
                if x.is_nan() {
                    return Err(Error::type_mismatch(argument, "logical scalar", "NaN"));
                }
                Ok(x != 0.0)
            }
        }
    }
}

impl FromValue for DVector<f64> {
    fn from_value(value: &Value, argument: &str) -> Result<Self> {
        match value {
            Value::Vector(v) => Ok(v.clone()),
            Value::Real(x) => Ok(DVector::from_element(1, *x)),
            Value::Integer(i) => Ok(DVector::from_element(1, *i as f64)),
            Value::Matrix(m) if m.ncols() == 1 => Ok(m.column(0).into_owned()),
            Value::Matrix(m) if m.nrows() == 1 => Ok(m.row(0).transpose()),
            other => Err(Error::type_mismatch(argument, "numeric vector", &other.describe())),
        }
    }
}

impl FromValue for DMatrix<f64> {
    fn from_value(value: &Value, argument: &str) -> Result<Self> {
        match value {
            Value::Matrix(m) => Ok(m.clone()),
            Value::Vector(v) => Ok(DMatrix::from_column_slice(v.len(), 1, v.as_slice())),
            Value::Real(x) => Ok(DMatrix::from_element(1, 1, *x)),
            Value::Integer(i) => Ok(DMatrix::from_element(1, 1, *i as f64)),
            other => Err(Error::type_mismatch(argument, "numeric matrix", &other.describe())),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Real(self)
    }
}

impl IntoValue for DVector<f64> {
    fn into_value(self) -> Value {
        Value::Vector(self)
    }
}

impl IntoValue for DMatrix<f64> {
    fn into_value(self) -> Value {
        Value::Matrix(self)
    }
}

impl IntoValue for RunLengthResult {
    /// Named list with entries `RL`, `signal`, `group` (one per sequence)
    /// and `T2` (one per phase-II row)
    fn into_value(self) -> Value {
        let runs = self.runs();
        let lengths = DVector::from_iterator(runs.len(), runs.iter().map(|r| r.length as f64));
        let signals = DVector::from_iterator(
            runs.len(),
            runs.iter().map(|r| if r.signaled { 1.0 } else { 0.0 }),
        );
        let groups = DVector::from_iterator(runs.len(), runs.iter().map(|r| r.group));
        let t2 = DVector::from_column_slice(self.t2());
        Value::list([
            ("RL", Value::Vector(lengths)),
            ("signal", Value::Vector(signals)),
            ("group", Value::Vector(groups)),
            ("T2", Value::Vector(t2)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robust_control::RunLength;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(f64::from_value(&Value::Real(0.5), "lambda").unwrap(), 0.5);
        assert_eq!(f64::from_value(&Value::Integer(2), "lambda").unwrap(), 2.0);
        assert_eq!(f64::from_value(&Value::from(vec![0.3]), "lambda").unwrap(), 0.3);
        assert!(f64::from_value(&Value::from(vec![0.3, 0.4]), "lambda").is_err());
    }

    #[test]
    fn test_bool_conversions() {
        assert!(bool::from_value(&Value::Logical(true), "huber").unwrap());
        assert!(!bool::from_value(&Value::Real(0.0), "huber").unwrap());
        assert!(bool::from_value(&Value::Integer(3), "huber").unwrap());
        assert!(bool::from_value(&Value::Real(f64::NAN), "huber").is_err());
        assert!(bool::from_value(&Value::Null, "huber").is_err());
    }

    #[test]
    fn test_vector_from_matrix() {
        let column = Value::from(DMatrix::from_column_slice(3, 1, &[1.0, 2.0, 3.0]));
        let row = Value::from(DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]));
        let expected = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(DVector::from_value(&column, "k").unwrap(), expected);
        assert_eq!(DVector::from_value(&row, "k").unwrap(), expected);

        let square = Value::from(DMatrix::<f64>::zeros(2, 2));
        assert!(DVector::<f64>::from_value(&square, "k").is_err());
    }

    #[test]
    fn test_matrix_from_vector_is_column() {
        let m = DMatrix::<f64>::from_value(&Value::from(vec![1.0, 2.0]), "X").unwrap();
        assert_eq!(m.shape(), (2, 1));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = DMatrix::<f64>::from_value(&Value::Logical(true), "X").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch for argument `X`: expected numeric matrix, got logical"
        );
    }

    #[test]
    fn test_run_length_result_into_list() {
        let result = RunLengthResult::new(
            vec![
                RunLength { group: 1.0, length: 4, signaled: true },
                RunLength { group: 2.0, length: 5, signaled: false },
            ],
            vec![0.5; 9],
        );
        let value = result.into_value();
        assert_eq!(value.get("RL"), Some(&Value::from(vec![4.0, 5.0])));
        assert_eq!(value.get("signal"), Some(&Value::from(vec![1.0, 0.0])));
        assert_eq!(value.get("group"), Some(&Value::from(vec![1.0, 2.0])));
        assert_eq!(value.get("T2").map(|v| v.describe()), Some("vector[9]".to_string()));
    }
}
