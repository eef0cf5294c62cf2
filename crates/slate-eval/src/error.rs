//! Evaluation error types.

use thiserror::Error;

/// Errors that can occur while evaluating a worksheet fragment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Integer overflow, division by zero, and friends.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// An operation was applied to values of the wrong kind.
    #[error("type error: {0}")]
    Type(String),

    /// A name was referenced but never defined.
    #[error("not found: {0}")]
    NotFound(String),

    /// A `???` placeholder was evaluated.
    #[error("an implementation is missing")]
    NotImplemented,

    /// A call supplied the wrong number of arguments.
    #[error("wrong number of arguments for '{name}': expected {expected}, got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// `new` was applied to a trait or abstract class without a refinement body.
    #[error("cannot instantiate {0}")]
    AbstractInstantiation(String),

    /// A built-in operation failed at runtime, like `head` of an empty list.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// The evaluation step budget ran out, usually due to runaway recursion
    /// or an unbounded loop encoded through self-application.
    #[error("evaluation budget exhausted")]
    GasExhausted,

    /// The call stack grew beyond the supported depth.
    #[error("maximum call depth exceeded")]
    DepthExceeded,
}

/// Evaluation result type alias.
pub type EvalResult<T> = Result<T, EvalError>;
