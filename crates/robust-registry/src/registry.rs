//! Named call table for the control-chart routines
//!
//! Every routine is registered with its name and the number of positional
//! arguments it takes. A call converts each argument with [`FromValue`],
//! invokes the typed routine and wraps the result with [`IntoValue`].
//! Only registered names can be called.

use crate::convert::{FromValue, IntoValue};
use crate::error::{Error, Result};
use crate::value::Value;
use nalgebra::{DMatrix, DVector};
use robust_control as rc;
use tracing::{debug, instrument};

/// Prefix of the exported symbol name of every routine
pub const SYMBOL_PREFIX: &str = "_robustcharts_";

/// Signature shared by every registered routine
pub type Routine = fn(&[Value]) -> Result<Value>;

/// One row of the call table
#[derive(Clone, Copy)]
pub struct CallEntry {
    pub name: &'static str,
    pub arity: usize,
    pub routine: Routine,
}

impl CallEntry {
    /// Exported symbol name, e.g. `_robustcharts_score`
    pub fn symbol(&self) -> String {
        format!("{SYMBOL_PREFIX}{}", self.name)
    }
}

impl std::fmt::Debug for CallEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallEntry")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Arity check repeated inside each routine so that calling a routine
/// directly, or through an entry registered with the wrong arity, fails
/// with an error
fn check_arity(args: &[Value], routine: &str, expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::ArityMismatch {
            routine: routine.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn arg<T: FromValue>(args: &[Value], position: usize, name: &str) -> Result<T> {
    let value = args
        .get(position)
        .ok_or_else(|| Error::type_mismatch(name, "an argument", "nothing"))?;
    T::from_value(value, name)
}

fn call_score(args: &[Value]) -> Result<Value> {
    check_arity(args, "score", 4)?;
    let e: DMatrix<f64> = arg(args, 0, "e")?;
    let lambda: f64 = arg(args, 1, "lambda")?;
    let k: DMatrix<f64> = arg(args, 2, "k")?;
    let huber: bool = arg(args, 3, "huber")?;
    Ok(rc::score(&e, lambda, &k, huber)?.into_value())
}

fn call_score2(args: &[Value]) -> Result<Value> {
    check_arity(args, "score2", 4)?;
    let e: DVector<f64> = arg(args, 0, "e")?;
    let lambda: f64 = arg(args, 1, "lambda")?;
    let k: DVector<f64> = arg(args, 2, "k")?;
    let huber: bool = arg(args, 3, "huber")?;
    Ok(rc::score2(&e, lambda, &k, huber)?.into_value())
}

fn call_statistic_y_ewma_vec(args: &[Value]) -> Result<Value> {
    check_arity(args, "statisticY_EWMA_vec", 5)?;
    let x: DVector<f64> = arg(args, 0, "X")?;
    let y_previous: DVector<f64> = arg(args, 1, "Y_previous")?;
    let lambda: f64 = arg(args, 2, "lambda")?;
    let k: DVector<f64> = arg(args, 3, "k")?;
    let huber: bool = arg(args, 4, "huber")?;
    Ok(rc::statistic_y_ewma_vec(&x, &y_previous, lambda, &k, huber)?.into_value())
}

fn call_statistic_y_ewma(args: &[Value]) -> Result<Value> {
    check_arity(args, "statisticY_EWMA_cpp", 5)?;
    let x: DMatrix<f64> = arg(args, 0, "X")?;
    let lambda: f64 = arg(args, 1, "lambda")?;
    let k: DVector<f64> = arg(args, 2, "k")?;
    let huber: bool = arg(args, 3, "huber")?;
    let idx: DVector<f64> = arg(args, 4, "idx")?;
    Ok(rc::statistic_y_ewma(&x, lambda, &k, huber, &idx)?.into_value())
}

fn call_calculate_t2(args: &[Value]) -> Result<Value> {
    check_arity(args, "calculate_T2", 3)?;
    let y: DVector<f64> = arg(args, 0, "Y")?;
    let vectors: DMatrix<f64> = arg(args, 1, "Vectors")?;
    let values: DVector<f64> = arg(args, 2, "Values")?;
    Ok(rc::calculate_t2(&y, &vectors, &values)?.into_value())
}

fn call_calculate_t2_vec(args: &[Value]) -> Result<Value> {
    check_arity(args, "calculate_T2_vec", 3)?;
    let y: DMatrix<f64> = arg(args, 0, "Y")?;
    let vectors: DMatrix<f64> = arg(args, 1, "Vectors")?;
    let values: DVector<f64> = arg(args, 2, "Values")?;
    Ok(rc::calculate_t2_vec(&y, &vectors, &values)?.into_value())
}

fn call_get_rl(args: &[Value]) -> Result<Value> {
    check_arity(args, "get_RL_cpp", 10)?;
    let x2: DMatrix<f64> = arg(args, 0, "X2")?;
    let x_ic: DMatrix<f64> = arg(args, 1, "X_IC")?;
    let idx2: DVector<f64> = arg(args, 2, "idx2")?;
    let idx_ic: DVector<f64> = arg(args, 3, "idx_IC")?;
    let lambda: f64 = arg(args, 4, "lambda")?;
    let k: DVector<f64> = arg(args, 5, "k")?;
    let huber: bool = arg(args, 6, "huber")?;
    let h: f64 = arg(args, 7, "h")?;
    let values: DVector<f64> = arg(args, 8, "Values")?;
    let vectors: DMatrix<f64> = arg(args, 9, "Vectors")?;
    let result = rc::get_run_length(
        &x2, &x_ic, &idx2, &idx_ic, lambda, &k, huber, h, &values, &vectors,
    )?;
    Ok(result.into_value())
}

/// Built-in routines, in registration order
pub static CALL_ENTRIES: &[CallEntry] = &[
    CallEntry { name: "score", arity: 4, routine: call_score },
    CallEntry { name: "score2", arity: 4, routine: call_score2 },
    CallEntry { name: "statisticY_EWMA_vec", arity: 5, routine: call_statistic_y_ewma_vec },
    CallEntry { name: "statisticY_EWMA_cpp", arity: 5, routine: call_statistic_y_ewma },
    CallEntry { name: "calculate_T2", arity: 3, routine: call_calculate_t2 },
    CallEntry { name: "calculate_T2_vec", arity: 3, routine: call_calculate_t2_vec },
    CallEntry { name: "get_RL_cpp", arity: 10, routine: call_get_rl },
];

/// A call table mapping names to routines
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<CallEntry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            entries: CALL_ENTRIES.to_vec(),
        }
    }
}

impl Registry {
    /// Registry holding the built-in routines
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no routines
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add a routine; names must be unique
    pub fn register(&mut self, entry: CallEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(Error::Routine(robust_core::Error::InvalidParameter(format!(
                "routine {} is already registered",
                entry.name
            ))));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Registered routines, in registration order
    pub fn entries(&self) -> &[CallEntry] {
        &self.entries
    }

    /// Find a routine by name or by exported symbol name
    pub fn lookup(&self, name: &str) -> Option<&CallEntry> {
        let bare = name.strip_prefix(SYMBOL_PREFIX).unwrap_or(name);
        self.entries.iter().find(|e| e.name == bare)
    }

    /// Call a routine with positional arguments
    #[instrument(skip(self, args), fields(argc = args.len()))]
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let entry = self
            .lookup(name)
            .ok_or_else(|| Error::UnknownRoutine(name.to_string()))?;
        if args.len() != entry.arity {
            return Err(Error::ArityMismatch {
                routine: entry.name.to_string(),
                expected: entry.arity,
                got: args.len(),
            });
        }
        debug!("Dispatching {}", entry.name);
        (entry.routine)(args)
    }
}

/// Call a built-in routine
pub fn call(name: &str, args: &[Value]) -> Result<Value> {
    Registry::new().call(name, args)
}
