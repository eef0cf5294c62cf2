//! The production oracle: a fresh interpreter per evaluation.

use slate_eval::{Interpreter, Value};
use slate_sheet::{Evaluated, Oracle, OracleError};
use slate_types::ast::{Expr, Stmt};

/// Evaluates every node in a fresh [`Interpreter`] so state from one line
/// can never leak into the next; only the replayed context carries over.
/// The configured gas limit applies to each call independently.
pub struct EvalOracle {
    gas_limit: u64,
}

impl EvalOracle {
    pub fn new(gas_limit: u64) -> Self {
        Self { gas_limit }
    }
}

impl Default for EvalOracle {
    fn default() -> Self {
        Self::new(slate_eval::DEFAULT_GAS_LIMIT)
    }
}

impl Oracle for EvalOracle {
    fn evaluate(&mut self, context: &[Stmt], expr: &Expr) -> Result<Evaluated, OracleError> {
        let mut interp = Interpreter::with_gas_limit(self.gas_limit);
        match interp.eval_with_context(context, expr) {
            Ok(Value::Unit) => Ok(Evaluated::Unit),
            Ok(value) => Ok(Evaluated::Value(value.render())),
            Err(err) => Err(OracleError::new(err.to_string())),
        }
    }
}
