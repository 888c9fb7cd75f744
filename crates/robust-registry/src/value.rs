//! Generic value representation exchanged at the call boundary

use nalgebra::{DMatrix, DVector};
use std::fmt;

/// An untyped argument or result
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Logical(bool),
    Integer(i64),
    Real(f64),
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
    /// Ordered named entries
    List(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Logical(_) => "logical",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Vector(_) => "vector",
            Value::Matrix(_) => "matrix",
            Value::List(_) => "list",
        }
    }

    /// Describe the value with its shape, e.g. `matrix[3x2]`
    pub fn describe(&self) -> String {
        match self {
            Value::Vector(v) => format!("vector[{}]", v.len()),
            Value::Matrix(m) => format!("matrix[{}x{}]", m.nrows(), m.ncols()),
            Value::List(entries) => format!("list[{}]", entries.len()),
            other => other.type_name().to_string(),
        }
    }

    /// Build a named list
    pub fn list<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::List(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a named entry of a list
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::List(entries) => entries.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Logical(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Vector(v) => {
                let items: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Matrix(m) => write!(f, "{}", m),
            Value::List(entries) => {
                writeln!(f, "List:")?;
                for (name, value) in entries {
                    writeln!(f, "  ${name}: {}", value.describe())?;
                }
                Ok(())
            }
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Logical(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<DVector<f64>> for Value {
    fn from(v: DVector<f64>) -> Self {
        Value::Vector(v)
    }
}

impl From<DMatrix<f64>> for Value {
    fn from(m: DMatrix<f64>) -> Self {
        Value::Matrix(m)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(DVector::from_vec(v))
    }
}
