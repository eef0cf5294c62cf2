//! Worksheet annotation: deterministic argument sampling, auto-invocation,
//! and the per-line output table.
//!
//! The [`Walker`] drives everything: it walks a parsed fragment statement
//! by statement, synthesizes sample arguments for definitions and classes
//! via [`synth`], asks an [`Oracle`] for runtime values, and merges the
//! rendered results into a [`RenderedOutput`] with one slot per source
//! line. The oracle trait keeps this crate free of any interpreter
//! dependency.

pub mod pool;
pub mod render;
pub mod synth;
pub mod walker;

use slate_types::ast::{Expr, Stmt};
use thiserror::Error;

pub use pool::SamplePool;
pub use render::RenderedOutput;
pub use walker::{Annotation, AnnotationKind, Walker};

/// A runtime value as the oracle reports it: rendered display text, or the
/// unit value, which annotates as nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluated {
    Value(String),
    Unit,
}

/// An evaluation failure surfaced by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OracleError {
    pub message: String,
}

impl OracleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The evaluation seam between the walker and an interpreter.
///
/// `context` holds every statement preceding the node under evaluation, in
/// source order. Implementations replay the context into a fresh scope and
/// evaluate `expr` against it; a failed context statement leaves its name
/// unbound rather than failing the whole call.
pub trait Oracle {
    fn evaluate(&mut self, context: &[Stmt], expr: &Expr) -> Result<Evaluated, OracleError>;
}
