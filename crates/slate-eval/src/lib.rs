//! Slate interpreter: evaluates worksheet declarations and expressions.

pub mod env;
pub mod error;
pub mod evaluator;
pub mod value;

pub use error::{EvalError, EvalResult};
pub use evaluator::{Interpreter, DEFAULT_GAS_LIMIT};
pub use value::{Instance, InstanceKind, Value};
