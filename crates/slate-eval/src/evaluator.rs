//! Core expression and statement interpreter.
//!
//! The interpreter is deliberately small: worksheet fragments are short and
//! every annotation pass gets a fresh instance, so there is no caching, no
//! bytecode, just a tree walk with a gas counter. Declarations register
//! themselves via [`Interpreter::declare`]; expressions evaluate through
//! [`Interpreter::eval_expr`]. Replaying a fragment prefix before evaluating
//! one expression is what [`Interpreter::eval_with_context`] is for.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use slate_types::ast::*;

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::value::{Instance, InstanceKind, Value};

/// Default gas limit, generous enough for any sane worksheet.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// Maximum user-level call depth. Keeps runaway recursion from exhausting
/// the host stack before the gas counter catches it.
const MAX_CALL_DEPTH: usize = 256;

/// A registered method plus the scope depth where it was declared. The
/// depth decides how much of the environment the body may see: a top-level
/// method sees only the global scope, a block-local helper also sees the
/// block it was declared in.
#[derive(Debug, Clone)]
struct DefEntry {
    def: DefDef,
    depth: usize,
}

/// The tree-walking interpreter.
pub struct Interpreter {
    /// Variable environment (scoped).
    pub env: Environment,
    /// Gas counter; limits total steps to prevent infinite loops.
    pub gas: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Registered top-level and block-local methods, by name.
    defs: BTreeMap<String, DefEntry>,
    /// Registered class and trait declarations, by name.
    types: BTreeMap<String, TypeDef>,
    /// The instance whose method body is currently running, if any.
    /// Bare names inside a method resolve against its members first.
    current_self: Option<Instance>,
    /// Current user-level call depth.
    call_depth: usize,
}

impl Interpreter {
    /// Creates an interpreter with the default gas limit.
    pub fn new() -> Self {
        Self::with_gas_limit(DEFAULT_GAS_LIMIT)
    }

    /// Creates an interpreter with the given gas limit.
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self {
            env: Environment::new(),
            gas: 0,
            gas_limit,
            defs: BTreeMap::new(),
            types: BTreeMap::new(),
            current_self: None,
            call_depth: 0,
        }
    }

    /// Consumes one unit of gas. Returns an error once exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.gas_limit {
            Err(EvalError::GasExhausted)
        } else {
            Ok(())
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement execution
    // ══════════════════════════════════════════════════════════════════════

    /// Replays the context declarations, then evaluates the expression.
    ///
    /// A context declaration that fails to evaluate is left unbound rather
    /// than aborting the whole call, so only expressions that actually
    /// depend on it fail in turn.
    pub fn eval_with_context(&mut self, context: &[Stmt], expr: &Expr) -> EvalResult<Value> {
        for stmt in context {
            let _ = self.declare(stmt);
        }
        self.eval_expr(expr)
    }

    /// Registers a declaration without treating it as an expression to
    /// report: `val` initializers run and bind, `def`s and types register,
    /// `object`s construct their singleton. Expression statements and empty
    /// statements are skipped.
    pub fn declare(&mut self, stmt: &Stmt) -> EvalResult<()> {
        self.tick()?;
        match stmt {
            Stmt::Val(val) => {
                if let Some(init) = &val.init {
                    let value = self.eval_expr(init)?;
                    self.env.define(&val.name.name, value);
                }
                Ok(())
            }
            Stmt::Def(def) => {
                if def.body.is_some() {
                    let entry = DefEntry {
                        def: def.clone(),
                        depth: self.env.depth(),
                    };
                    self.defs.insert(def.name.name.clone(), entry);
                }
                Ok(())
            }
            Stmt::Type(ty) => {
                self.types.insert(ty.name.name.clone(), ty.clone());
                Ok(())
            }
            Stmt::Object(obj) => {
                let singleton = self.build_object(obj)?;
                self.env.define(&obj.name.name, singleton);
                Ok(())
            }
            Stmt::Expr(_) | Stmt::Empty(_) => Ok(()),
        }
    }

    /// Executes a single statement for its value. Declarations register and
    /// yield `()`; expression statements evaluate.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        match stmt {
            Stmt::Expr(expr) => {
                self.tick()?;
                self.eval_expr(expr)
            }
            other => {
                self.declare(other)?;
                Ok(Value::Unit)
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluates an expression to a value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tick()?;
        match &expr.kind {
            ExprKind::IntLit(n) => Ok(Value::Int(*n)),
            ExprKind::LongLit(n) => Ok(Value::Long(*n)),
            ExprKind::DoubleLit(x) => Ok(Value::Double(*x)),
            ExprKind::FloatLit(x) => Ok(Value::Float(*x)),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::CharLit(c) => Ok(Value::Char(*c)),
            ExprKind::StrLit(s) => Ok(Value::Str(s.clone())),
            ExprKind::Unimplemented => Err(EvalError::NotImplemented),

            ExprKind::Name(name) => self.eval_name(name),
            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::Select { receiver, name } => self.eval_select(receiver, &name.name),
            ExprKind::New { class, args, body } => {
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_expr(arg)?);
                }
                self.instantiate(&class.name, arg_values, body.as_deref())
            }

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.eval_if(cond, then_branch, else_branch.as_deref()),
            ExprKind::Block(stmts) => self.eval_block(stmts),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    /// Resolves a bare name: bindings first, then the collection constants,
    /// then methods. A parameterless method invokes on bare reference.
    fn eval_name(&mut self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        match name {
            "None" => return Ok(Value::Opt(None)),
            "Nil" => return Ok(Value::List(Vec::new())),
            _ => {}
        }
        if let Some(inst) = &self.current_self {
            if let Some(def) = inst.method(name) {
                let (inst, def) = (inst.clone(), def.clone());
                return self.invoke_parameterless(&inst, &def, name);
            }
        }
        if let Some(entry) = self.defs.get(name).cloned() {
            if entry.def.param_count() == 0 {
                let groups = vec![Vec::new(); entry.def.param_groups.len()];
                return self.invoke_def(&entry.def, groups, entry.depth);
            }
            return Err(EvalError::Type(format!(
                "missing argument list for method '{name}'"
            )));
        }
        Err(EvalError::NotFound(format!("value {name}")))
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        // Short-circuit for the logical operators
        if op == BinOp::And {
            let lv = self.eval_expr(left)?;
            return if !expect_bool(&lv, "&&")? {
                Ok(Value::Bool(false))
            } else {
                let rv = self.eval_expr(right)?;
                Ok(Value::Bool(expect_bool(&rv, "&&")?))
            };
        }
        if op == BinOp::Or {
            let lv = self.eval_expr(left)?;
            return if expect_bool(&lv, "||")? {
                Ok(Value::Bool(true))
            } else {
                let rv = self.eval_expr(right)?;
                Ok(Value::Bool(expect_bool(&rv, "||")?))
            };
        }

        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinOp::Add => self.eval_add(&lv, &rv),
            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => self.eval_arith(&lv, &rv, op),
            BinOp::Eq => Ok(Value::Bool(self.structural_eq(&lv, &rv))),
            BinOp::NotEq => Ok(Value::Bool(!self.structural_eq(&lv, &rv))),
            BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
                self.eval_comparison(&lv, &rv, op)
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    /// `+` is concatenation as soon as either side is a string; otherwise
    /// it is numeric addition.
    fn eval_add(&mut self, lv: &Value, rv: &Value) -> EvalResult<Value> {
        if lv.is_numeric() && rv.is_numeric() {
            return self.eval_arith(lv, rv, BinOp::Add);
        }
        match (lv, rv) {
            (Value::Str(a), b) => Ok(Value::Str(format!("{a}{}", b.render()))),
            (a, Value::Str(b)) => Ok(Value::Str(format!("{}{b}", a.render()))),
            _ => Err(EvalError::Type(format!(
                "cannot apply '+' to {} and {}",
                lv.type_name(),
                rv.type_name()
            ))),
        }
    }

    /// Numeric arithmetic over the promoted operand pair. Integer widths
    /// use checked operations so overflow and `/ by zero` trap instead of
    /// wrapping.
    fn eval_arith(&mut self, lv: &Value, rv: &Value, op: BinOp) -> EvalResult<Value> {
        let Some(pair) = numeric_pair(lv, rv) else {
            return Err(EvalError::Type(format!(
                "cannot apply '{}' to {} and {}",
                op.as_str(),
                lv.type_name(),
                rv.type_name()
            )));
        };
        match pair {
            NumPair::Int(a, b) => {
                let result = match op {
                    BinOp::Add => a.checked_add(b),
                    BinOp::Sub => a.checked_sub(b),
                    BinOp::Mul => a.checked_mul(b),
                    BinOp::Div if b == 0 => {
                        return Err(EvalError::Arithmetic("/ by zero".to_string()));
                    }
                    BinOp::Div => a.checked_div(b),
                    BinOp::Mod if b == 0 => {
                        return Err(EvalError::Arithmetic("/ by zero".to_string()));
                    }
                    BinOp::Mod => a.checked_rem(b),
                    _ => None,
                };
                result
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::Arithmetic("integer overflow".to_string()))
            }
            NumPair::Long(a, b) => {
                let result = match op {
                    BinOp::Add => a.checked_add(b),
                    BinOp::Sub => a.checked_sub(b),
                    BinOp::Mul => a.checked_mul(b),
                    BinOp::Div if b == 0 => {
                        return Err(EvalError::Arithmetic("/ by zero".to_string()));
                    }
                    BinOp::Div => a.checked_div(b),
                    BinOp::Mod if b == 0 => {
                        return Err(EvalError::Arithmetic("/ by zero".to_string()));
                    }
                    BinOp::Mod => a.checked_rem(b),
                    _ => None,
                };
                result
                    .map(Value::Long)
                    .ok_or_else(|| EvalError::Arithmetic("integer overflow".to_string()))
            }
            NumPair::Float(a, b) => Ok(Value::Float(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                BinOp::Mod => a % b,
                _ => return Err(EvalError::Type(format!("'{}' is not numeric", op.as_str()))),
            })),
            NumPair::Double(a, b) => Ok(Value::Double(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                BinOp::Mod => a % b,
                _ => return Err(EvalError::Type(format!("'{}' is not numeric", op.as_str()))),
            })),
        }
    }

    /// Ordering comparisons over numbers, strings, and chars.
    fn eval_comparison(&mut self, lv: &Value, rv: &Value, op: BinOp) -> EvalResult<Value> {
        let ord = if let Some(pair) = numeric_pair(lv, rv) {
            match pair {
                NumPair::Int(a, b) => Some(a.cmp(&b)),
                NumPair::Long(a, b) => Some(a.cmp(&b)),
                NumPair::Float(a, b) => a.partial_cmp(&b),
                NumPair::Double(a, b) => a.partial_cmp(&b),
            }
        } else {
            match (lv, rv) {
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
                _ => {
                    return Err(EvalError::Type(format!(
                        "cannot compare {} and {} with '{}'",
                        lv.type_name(),
                        rv.type_name(),
                        op.as_str()
                    )));
                }
            }
        };
        // NaN compares false against everything.
        Ok(Value::Bool(ord.is_some_and(|o| ord_holds(op, o))))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOp::Neg => match value {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::Arithmetic("integer overflow".to_string())),
                Value::Long(n) => n
                    .checked_neg()
                    .map(Value::Long)
                    .ok_or_else(|| EvalError::Arithmetic("integer overflow".to_string())),
                Value::Float(x) => Ok(Value::Float(-x)),
                Value::Double(x) => Ok(Value::Double(-x)),
                other => Err(EvalError::Type(format!(
                    "cannot negate {}",
                    other.type_name()
                ))),
            },
            UnaryOp::Not => match value {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(EvalError::Type(format!(
                    "'!' requires a Bool, got {}",
                    other.type_name()
                ))),
            },
        }
    }

    fn eval_if(
        &mut self,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: Option<&Expr>,
    ) -> EvalResult<Value> {
        let cond_value = self.eval_expr(cond)?;
        let Value::Bool(flag) = cond_value else {
            return Err(EvalError::Type(format!(
                "if condition must be a Bool, got {}",
                cond_value.type_name()
            )));
        };
        if flag {
            self.eval_expr(then_branch)
        } else if let Some(else_expr) = else_branch {
            self.eval_expr(else_expr)
        } else {
            Ok(Value::Unit)
        }
    }

    /// Evaluates a block in its own scope. Definitions made inside the block
    /// are invisible afterwards; the value is that of the last non-empty
    /// statement, or `()` for a block ending in a declaration.
    fn eval_block(&mut self, stmts: &[Stmt]) -> EvalResult<Value> {
        self.env.push_scope();
        let saved_defs = self.defs.clone();
        let saved_types = self.types.clone();

        let mut last = Value::Unit;
        let mut failure = None;
        for stmt in stmts {
            if matches!(stmt, Stmt::Empty(_)) {
                continue;
            }
            match self.exec_stmt(stmt) {
                Ok(value) => last = value,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        self.types = saved_types;
        self.defs = saved_defs;
        self.env.pop_scope();
        match failure {
            Some(err) => Err(err),
            None => Ok(last),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluates a call expression. Curried calls parse as nested `Call`
    /// nodes with the outermost argument list on top, so the spine is
    /// flattened back into source-order argument groups first.
    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult<Value> {
        let mut expr_groups: Vec<&[Expr]> = vec![args];
        let mut base = callee;
        while let ExprKind::Call { callee, args } = &base.kind {
            expr_groups.push(args.as_slice());
            base = callee;
        }
        expr_groups.reverse();

        match &base.kind {
            ExprKind::Name(name) => self.call_named(name, &expr_groups),
            ExprKind::Select { receiver, name } => {
                self.call_method(receiver, &name.name, &expr_groups)
            }
            _ => {
                let value = self.eval_expr(base)?;
                Err(EvalError::Type(format!(
                    "{} is not callable",
                    value.type_name()
                )))
            }
        }
    }

    /// Calls a bare name: a method of the enclosing instance, a registered
    /// `def`, a case-class constructor, or a collection builtin.
    fn call_named(&mut self, name: &str, groups: &[&[Expr]]) -> EvalResult<Value> {
        if let Some(inst) = &self.current_self {
            if let Some(def) = inst.method(name) {
                let (inst, def) = (inst.clone(), def.clone());
                let value_groups = self.eval_arg_groups(groups)?;
                return self.invoke_method(&inst, &def, value_groups);
            }
        }
        if let Some(entry) = self.defs.get(name).cloned() {
            let value_groups = self.eval_arg_groups(groups)?;
            return self.invoke_def(&entry.def, value_groups, entry.depth);
        }
        if let Some(ty) = self.types.get(name).cloned() {
            if !ty.is_case || !ty.is_concrete() {
                return Err(EvalError::Type(format!(
                    "class '{name}' is not a case class; instantiate it with 'new'"
                )));
            }
            let mut value_groups = self.eval_arg_groups(groups)?;
            if value_groups.len() != 1 {
                let supplied: usize = value_groups.iter().map(Vec::len).sum();
                return Err(EvalError::Arity {
                    name: name.to_string(),
                    expected: ty.params.len(),
                    got: supplied,
                });
            }
            let args = value_groups.swap_remove(0);
            return self.instantiate(name, args, None);
        }
        match name {
            "List" | "Seq" => {
                let mut value_groups = self.eval_arg_groups(groups)?;
                if value_groups.len() != 1 {
                    return Err(EvalError::Type("a List is not callable".to_string()));
                }
                return Ok(Value::List(value_groups.swap_remove(0)));
            }
            "Some" => {
                let mut value_groups = self.eval_arg_groups(groups)?;
                let supplied: usize = value_groups.iter().map(Vec::len).sum();
                if value_groups.len() != 1 || value_groups[0].len() != 1 {
                    return Err(EvalError::Arity {
                        name: "Some".to_string(),
                        expected: 1,
                        got: supplied,
                    });
                }
                let mut args = value_groups.swap_remove(0);
                return Ok(Value::Opt(Some(Box::new(args.swap_remove(0)))));
            }
            _ => {}
        }
        if let Some(value) = self.env.get(name) {
            return Err(EvalError::Type(format!(
                "{} is not callable",
                value.type_name()
            )));
        }
        Err(EvalError::NotFound(format!("value {name}")))
    }

    /// Calls a method through an explicit receiver: `recv.name(args)`.
    fn call_method(&mut self, receiver: &Expr, name: &str, groups: &[&[Expr]]) -> EvalResult<Value> {
        let recv = self.eval_expr(receiver)?;
        let value_groups = self.eval_arg_groups(groups)?;
        match &recv {
            Value::Instance(inst) => {
                if let Some(def) = inst.method(name) {
                    let def = def.clone();
                    return self.invoke_method(inst, &def, value_groups);
                }
                if inst.field(name).is_some() {
                    return Err(EvalError::Type(format!(
                        "'{name}' of {} is not callable",
                        inst.type_name
                    )));
                }
                Err(EvalError::Type(format!(
                    "'{name}' is not a member of {}",
                    inst.type_name
                )))
            }
            _ => {
                if value_groups.len() != 1 {
                    return Err(EvalError::Type(format!(
                        "'{name}' is not a member of {}",
                        recv.type_name()
                    )));
                }
                self.builtin_member(&recv, name, &value_groups[0])
            }
        }
    }

    fn eval_arg_groups(&mut self, groups: &[&[Expr]]) -> EvalResult<Vec<Vec<Value>>> {
        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            let mut values = Vec::with_capacity(group.len());
            for arg in *group {
                values.push(self.eval_expr(arg)?);
            }
            out.push(values);
        }
        Ok(out)
    }

    /// Invokes a top-level or block-local method. The body sees the scopes
    /// enclosing its declaration plus its own parameters, never the
    /// caller's locals.
    fn invoke_def(
        &mut self,
        def: &DefDef,
        groups: Vec<Vec<Value>>,
        decl_depth: usize,
    ) -> EvalResult<Value> {
        let Some(body) = &def.body else {
            return Err(EvalError::NotImplemented);
        };
        self.call_depth += 1;
        if self.call_depth > MAX_CALL_DEPTH {
            self.call_depth -= 1;
            return Err(EvalError::DepthExceeded);
        }
        let saved_self = self.current_self.take();
        let saved_locals = self.env.isolate_above(decl_depth);
        self.env.push_scope();

        let result = match self.bind_params(def, &groups) {
            Ok(()) => self.eval_expr(body),
            Err(err) => Err(err),
        };

        self.env.restore(saved_locals);
        self.current_self = saved_self;
        self.call_depth -= 1;
        result
    }

    /// Invokes a method of an instance: fields bind below the parameters,
    /// and sibling methods stay reachable through the instance while the
    /// body runs.
    fn invoke_method(
        &mut self,
        inst: &Instance,
        def: &DefDef,
        groups: Vec<Vec<Value>>,
    ) -> EvalResult<Value> {
        let Some(body) = &def.body else {
            return Err(EvalError::NotImplemented);
        };
        self.call_depth += 1;
        if self.call_depth > MAX_CALL_DEPTH {
            self.call_depth -= 1;
            return Err(EvalError::DepthExceeded);
        }
        let saved_self = self.current_self.replace(inst.clone());
        let saved_locals = self.env.isolate();
        self.env.push_scope();
        for (field, value) in &inst.fields {
            self.env.define(field, value.clone());
        }
        self.env.push_scope();

        let result = match self.bind_params(def, &groups) {
            Ok(()) => self.eval_expr(body),
            Err(err) => Err(err),
        };

        self.env.restore(saved_locals);
        self.current_self = saved_self;
        self.call_depth -= 1;
        result
    }

    /// Invokes a parameterless method on bare-name or `.name` reference.
    fn invoke_parameterless(
        &mut self,
        inst: &Instance,
        def: &DefDef,
        name: &str,
    ) -> EvalResult<Value> {
        if def.param_count() != 0 {
            return Err(EvalError::Type(format!(
                "missing argument list for method '{name}'"
            )));
        }
        let groups = vec![Vec::new(); def.param_groups.len()];
        self.invoke_method(inst, def, groups)
    }

    /// Binds call arguments to parameters, group by group. Parameters left
    /// unsupplied fall back to their declared default; a parameter with
    /// neither is an arity error.
    fn bind_params(&mut self, def: &DefDef, groups: &[Vec<Value>]) -> EvalResult<()> {
        let supplied: usize = groups.iter().map(Vec::len).sum();
        let arity_err = |got: usize| EvalError::Arity {
            name: def.name.name.clone(),
            expected: def.param_count(),
            got,
        };
        if groups.len() != def.param_groups.len() {
            return Err(arity_err(supplied));
        }
        for (params, args) in def.param_groups.iter().zip(groups) {
            if args.len() > params.len() {
                return Err(arity_err(supplied));
            }
            for (i, param) in params.iter().enumerate() {
                let value = if i < args.len() {
                    args[i].clone()
                } else if let Some(default) = &param.default {
                    self.eval_expr(default)?
                } else {
                    return Err(arity_err(supplied));
                };
                self.env.define(&param.name.name, value);
            }
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Instantiation
    // ══════════════════════════════════════════════════════════════════════

    /// Instantiates a declared type: `new C(args)`, `new T { body }`, or
    /// case-class application. Builds the field table (constructor
    /// parameters first, then `val` members up the parent chain), and
    /// collects the concrete methods visible on the instance.
    fn instantiate(
        &mut self,
        name: &str,
        args: Vec<Value>,
        refinement: Option<&[Stmt]>,
    ) -> EvalResult<Value> {
        self.tick()?;
        let Some(ty) = self.types.get(name).cloned() else {
            return Err(EvalError::NotFound(format!("type {name}")));
        };
        if !ty.is_concrete() && refinement.is_none() {
            let kind = if ty.is_trait { "trait" } else { "abstract class" };
            return Err(EvalError::AbstractInstantiation(format!("{kind} '{name}'")));
        }

        // Constructor parameters, declaration order; defaults fill the tail.
        if args.len() > ty.params.len() {
            return Err(EvalError::Arity {
                name: name.to_string(),
                expected: ty.params.len(),
                got: args.len(),
            });
        }
        let mut fields: Vec<(String, Value)> = Vec::new();
        for (i, param) in ty.params.iter().enumerate() {
            let value = if i < args.len() {
                args[i].clone()
            } else if let Some(default) = &param.default {
                self.eval_expr(default)?
            } else {
                return Err(EvalError::Arity {
                    name: name.to_string(),
                    expected: ty.params.len(),
                    got: args.len(),
                });
            };
            fields.push((param.name.name.clone(), value));
        }
        let ctor_args: Vec<Value> = fields.iter().map(|(_, v)| v.clone()).collect();

        let mut visited = Vec::new();
        let mut lineage = Vec::new();
        self.collect_lineage(name, &mut visited, &mut lineage);

        // Concrete methods, nearest declaration first: the refinement body
        // shadows the class, which shadows its parents.
        let mut methods: Vec<DefDef> = Vec::new();
        if let Some(body) = refinement {
            collect_concrete_defs(body, &mut methods);
        }
        for ancestor in &lineage {
            collect_concrete_defs(&ancestor.members, &mut methods);
        }

        let kind = if refinement.is_some() {
            InstanceKind::Anon
        } else {
            InstanceKind::Class { ctor_args }
        };
        let mut inst = Instance {
            type_name: name.to_string(),
            kind,
            fields,
            methods,
        };

        // `val` members evaluate base-to-derived so derived declarations
        // overwrite inherited ones, with constructor parameters and the
        // fields computed so far in scope.
        let saved_self = self.current_self.replace(inst.clone());
        self.env.push_scope();
        for (field, value) in &inst.fields {
            self.env.define(field, value.clone());
        }
        let mut failure = None;
        'members: for ancestor in lineage.iter().rev() {
            for member in &ancestor.members {
                if let Err(err) = self.init_val_member(member, &mut inst) {
                    failure = Some(err);
                    break 'members;
                }
            }
        }
        if failure.is_none() {
            if let Some(body) = refinement {
                for member in body {
                    if let Err(err) = self.init_val_member(member, &mut inst) {
                        failure = Some(err);
                        break;
                    }
                }
            }
        }
        self.env.pop_scope();
        self.current_self = saved_self;

        match failure {
            Some(err) => Err(err),
            None => Ok(Value::Instance(inst)),
        }
    }

    /// Evaluates one `val` member during instantiation and folds it into
    /// the instance's field table.
    fn init_val_member(&mut self, member: &Stmt, inst: &mut Instance) -> EvalResult<()> {
        let Stmt::Val(val) = member else {
            return Ok(());
        };
        let Some(init) = &val.init else {
            return Ok(());
        };
        let value = self.eval_expr(init)?;
        self.env.define(&val.name.name, value.clone());
        upsert_field(&mut inst.fields, &val.name.name, value);
        self.current_self = Some(inst.clone());
        Ok(())
    }

    /// Collects the type itself followed by its parents, depth-first.
    /// Cycles and unknown parents are skipped rather than reported; a
    /// member that relied on the missing parent fails at lookup time.
    fn collect_lineage(&self, name: &str, visited: &mut Vec<String>, out: &mut Vec<TypeDef>) {
        if visited.iter().any(|n| n == name) {
            return;
        }
        visited.push(name.to_string());
        let Some(ty) = self.types.get(name) else {
            return;
        };
        out.push(ty.clone());
        for parent in &ty.parents {
            self.collect_lineage(&parent.name, visited, out);
        }
    }

    /// Builds the singleton for an `object` declaration: methods collect
    /// first so `val` members can call them, then the `val` members
    /// evaluate top to bottom.
    fn build_object(&mut self, obj: &ObjectDef) -> EvalResult<Value> {
        let mut methods = Vec::new();
        for member in &obj.members {
            if let Stmt::Def(def) = member {
                if def.body.is_some() {
                    methods.push(def.clone());
                }
            }
        }
        let mut inst = Instance {
            type_name: obj.name.name.clone(),
            kind: InstanceKind::Object,
            fields: Vec::new(),
            methods,
        };

        let saved_self = self.current_self.replace(inst.clone());
        self.env.push_scope();
        let mut failure = None;
        for member in &obj.members {
            if let Err(err) = self.init_val_member(member, &mut inst) {
                failure = Some(err);
                break;
            }
        }
        self.env.pop_scope();
        self.current_self = saved_self;

        match failure {
            Some(err) => Err(err),
            None => Ok(Value::Instance(inst)),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Member access & builtins
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluates `recv.name` without an argument list: a field, a
    /// parameterless method, or a builtin member of a primitive value.
    fn eval_select(&mut self, receiver: &Expr, name: &str) -> EvalResult<Value> {
        let recv = self.eval_expr(receiver)?;
        match &recv {
            Value::Instance(inst) => {
                if let Some(value) = inst.field(name) {
                    return Ok(value.clone());
                }
                if let Some(def) = inst.method(name) {
                    let def = def.clone();
                    return self.invoke_parameterless(inst, &def, name);
                }
                Err(EvalError::Type(format!(
                    "'{name}' is not a member of {}",
                    inst.type_name
                )))
            }
            _ => self.builtin_member(&recv, name, &[]),
        }
    }

    /// Built-in members of lists, strings, and optionals. Parameterless
    /// members also accept an explicit empty argument list.
    fn builtin_member(&mut self, recv: &Value, name: &str, args: &[Value]) -> EvalResult<Value> {
        let arity = |expected: usize| EvalError::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        };
        match (recv, name) {
            (Value::List(items), "length") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Int(items.len() as i32))
            }
            (Value::List(items), "isEmpty") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Bool(items.is_empty()))
            }
            (Value::List(items), "head") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                items
                    .first()
                    .cloned()
                    .ok_or_else(|| EvalError::Runtime("head of empty list".to_string()))
            }
            (Value::List(items), "sum") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                let mut total = Value::Int(0);
                for item in items {
                    if !item.is_numeric() {
                        return Err(EvalError::Type(format!(
                            "cannot sum a list containing {}",
                            item.type_name()
                        )));
                    }
                    total = self.eval_arith(&total, item, BinOp::Add)?;
                }
                Ok(total)
            }
            (Value::List(items), "contains") => {
                if args.len() != 1 {
                    return Err(arity(1));
                }
                let found = items.iter().any(|item| self.structural_eq(item, &args[0]));
                Ok(Value::Bool(found))
            }
            (Value::Str(s), "length") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Int(s.chars().count() as i32))
            }
            (Value::Str(s), "toUpperCase") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Str(s.to_uppercase()))
            }
            (Value::Str(s), "toLowerCase") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Str(s.to_lowercase()))
            }
            (Value::Opt(opt), "isEmpty") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Bool(opt.is_none()))
            }
            (Value::Opt(opt), "isDefined") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                Ok(Value::Bool(opt.is_some()))
            }
            (Value::Opt(opt), "get") => {
                if !args.is_empty() {
                    return Err(arity(0));
                }
                match opt {
                    Some(inner) => Ok((**inner).clone()),
                    None => Err(EvalError::Runtime("None.get".to_string())),
                }
            }
            (Value::Opt(opt), "getOrElse") => {
                if args.len() != 1 {
                    return Err(arity(1));
                }
                match opt {
                    Some(inner) => Ok((**inner).clone()),
                    None => Ok(args[0].clone()),
                }
            }
            _ => Err(EvalError::Type(format!(
                "'{name}' is not a member of {}",
                recv.type_name()
            ))),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Structural equality
    // ══════════════════════════════════════════════════════════════════════

    /// Deep equality. Numbers compare across widths, so `3 == 3L` and
    /// `3 == 3.0` both hold; instances compare by type and fields.
    pub fn structural_eq(&self, a: &Value, b: &Value) -> bool {
        if let Some(pair) = numeric_pair(a, b) {
            return match pair {
                NumPair::Int(x, y) => x == y,
                NumPair::Long(x, y) => x == y,
                NumPair::Float(x, y) => x == y,
                NumPair::Double(x, y) => x == y,
            };
        }
        match (a, b) {
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Char(x), Value::Char(y)) => x == y,
            (Value::Unit, Value::Unit) => true,
            (Value::List(xs), Value::List(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(x, y)| self.structural_eq(x, y))
            }
            (Value::Opt(x), Value::Opt(y)) => match (x, y) {
                (None, None) => true,
                (Some(p), Some(q)) => self.structural_eq(p, q),
                _ => false,
            },
            (Value::Instance(i), Value::Instance(j)) => {
                i.type_name == j.type_name
                    && i.fields.len() == j.fields.len()
                    && i.fields.iter().zip(&j.fields).all(|((n1, v1), (n2, v2))| {
                        n1 == n2 && self.structural_eq(v1, v2)
                    })
            }
            _ => false,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Numeric promotion
// ══════════════════════════════════════════════════════════════════════════

/// A pair of numeric operands promoted to their common width.
enum NumPair {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

/// Promotes two numeric values to a common width: Int, then Long, then
/// Float, then Double. Returns `None` if either operand is not numeric.
fn numeric_pair(a: &Value, b: &Value) -> Option<NumPair> {
    use Value::*;
    Some(match (a, b) {
        (Int(x), Int(y)) => NumPair::Int(*x, *y),

        (Long(x), Long(y)) => NumPair::Long(*x, *y),
        (Int(x), Long(y)) => NumPair::Long(i64::from(*x), *y),
        (Long(x), Int(y)) => NumPair::Long(*x, i64::from(*y)),

        (Float(x), Float(y)) => NumPair::Float(*x, *y),
        (Int(x), Float(y)) => NumPair::Float(*x as f32, *y),
        (Float(x), Int(y)) => NumPair::Float(*x, *y as f32),
        (Long(x), Float(y)) => NumPair::Float(*x as f32, *y),
        (Float(x), Long(y)) => NumPair::Float(*x, *y as f32),

        (Double(x), Double(y)) => NumPair::Double(*x, *y),
        (Int(x), Double(y)) => NumPair::Double(f64::from(*x), *y),
        (Double(x), Int(y)) => NumPair::Double(*x, f64::from(*y)),
        (Long(x), Double(y)) => NumPair::Double(*x as f64, *y),
        (Double(x), Long(y)) => NumPair::Double(*x, *y as f64),
        (Float(x), Double(y)) => NumPair::Double(f64::from(*x), *y),
        (Double(x), Float(y)) => NumPair::Double(*x, f64::from(*y)),

        _ => return None,
    })
}

fn ord_holds(op: BinOp, ord: Ordering) -> bool {
    match op {
        BinOp::Less => ord == Ordering::Less,
        BinOp::LessEq => ord != Ordering::Greater,
        BinOp::Greater => ord == Ordering::Greater,
        BinOp::GreaterEq => ord != Ordering::Less,
        _ => false,
    }
}

fn expect_bool(value: &Value, op: &str) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(EvalError::Type(format!(
            "'{op}' requires Bool operands, got {}",
            other.type_name()
        ))),
    }
}

fn upsert_field(fields: &mut Vec<(String, Value)>, name: &str, value: Value) {
    match fields.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => fields.push((name.to_string(), value)),
    }
}

/// Appends the concrete `def` members not already present by name.
fn collect_concrete_defs(members: &[Stmt], methods: &mut Vec<DefDef>) {
    for member in members {
        if let Stmt::Def(def) = member {
            if def.body.is_some() && !methods.iter().any(|m| m.name.name == def.name.name) {
                methods.push(def.clone());
            }
        }
    }
}
