//! Call-by-name surface for the robust control-chart routines
//!
//! A host environment hands over untyped [`Value`]s and a routine name; the
//! [`Registry`] converts the arguments, runs the routine from
//! `robust-control` and wraps the result.
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use robust_registry::{call, Value};
//!
//! let y = Value::from(vec![1.0, 2.0]);
//! let vectors = Value::from(DMatrix::<f64>::identity(2, 2));
//! let values = Value::from(vec![1.0, 4.0]);
//!
//! let t2 = call("calculate_T2", &[y, vectors, values]).unwrap();
//! assert_eq!(t2, Value::Real(2.0));
//! ```

pub mod convert;
pub mod error;
pub mod registry;
pub mod value;

pub use convert::{FromValue, IntoValue};
pub use error::{Error, Result};
pub use registry::{call, CallEntry, Registry, Routine, CALL_ENTRIES, SYMBOL_PREFIX};
pub use value::Value;
