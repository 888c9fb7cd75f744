//! Error types for robust-registry

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown routine: {0}")]
    UnknownRoutine(String),

    #[error("Arity mismatch for {routine}: expected {expected} arguments, got {got}")]
    ArityMismatch {
        routine: String,
        expected: usize,
        got: usize,
    },

    #[error("Type mismatch for argument `{argument}`: expected {expected}, got {got}")]
    TypeMismatch {
        argument: String,
        expected: String,
        got: String,
    },

    #[error("Routine error: {0}")]
    Routine(#[from] robust_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn type_mismatch(argument: &str, expected: &str, got: &str) -> Self {
        Self::TypeMismatch {
            argument: argument.to_string(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}
