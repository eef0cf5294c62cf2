//! The statement walker that turns a parsed fragment into line annotations.

use slate_types::ast::{
    DefDef, Expr, ExprKind, Fragment, Ident, ObjectDef, Stmt, TypeDef, ValDef,
};
use slate_types::Span;

use crate::pool::SamplePool;
use crate::render::RenderedOutput;
use crate::synth::sample_params;
use crate::{Evaluated, Oracle};

/// One display record, tied to the 1-based source line it annotates.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub line: u32,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn render(&self) -> String {
        self.kind.render()
    }
}

/// The result shapes a walked node can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    /// A value binding: `name = <inner>`, or `name: T = <inner>` when the
    /// source declared a type.
    Value {
        name: String,
        declared_type: Option<String>,
        inner: Box<AnnotationKind>,
    },
    /// An auto-invoked function: `name(arg = sample) => <inner>`.
    Function {
        signature: String,
        inner: Box<AnnotationKind>,
    },
    /// A bare expression's final value.
    Expression { value: String },
    /// An evaluation failure, rendered as `throws <message>`.
    Error { message: String },
    /// A body left as `???`, rendered unevaluated.
    NotImplemented,
    /// A rendered runtime value, used as the payload of a binding.
    PlainValue { value: String },
}

impl AnnotationKind {
    pub fn render(&self) -> String {
        match self {
            AnnotationKind::Value {
                name,
                declared_type: Some(ty),
                inner,
            } => format!("{name}: {ty} = {}", inner.render()),
            AnnotationKind::Value {
                name,
                declared_type: None,
                inner,
            } => format!("{name} = {}", inner.render()),
            AnnotationKind::Function { signature, inner } => {
                format!("{signature} => {}", inner.render())
            }
            AnnotationKind::Expression { value } => value.clone(),
            AnnotationKind::Error { message } => format!("throws {message}"),
            AnnotationKind::NotImplemented => "???".to_string(),
            AnnotationKind::PlainValue { value } => value.clone(),
        }
    }
}

/// Walks a fragment statement by statement, asking the oracle for runtime
/// values and merging one rendered annotation per visible node.
///
/// Each statement is evaluated against the statements before it, so a line
/// sees every earlier binding but never a later one. Definitions with
/// parameters are auto-invoked with samples drawn from the walker's pool;
/// the pool lives as long as the walker, so sample sequences advance across
/// the whole fragment and reset only when a fresh walker is built.
pub struct Walker<'a> {
    oracle: &'a mut dyn Oracle,
    pool: SamplePool,
}

impl<'a> Walker<'a> {
    pub fn new(oracle: &'a mut dyn Oracle) -> Self {
        Self {
            oracle,
            pool: SamplePool::new(),
        }
    }

    /// Annotates `fragment` into a table of `line_count` output lines.
    pub fn annotate_fragment(&mut self, fragment: &Fragment, line_count: usize) -> RenderedOutput {
        let mut out = RenderedOutput::new(line_count);
        self.walk_stmts(&fragment.stmts, &[], &mut out);
        out
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement dispatch
    // ══════════════════════════════════════════════════════════════════════

    fn walk_stmts(&mut self, stmts: &[Stmt], base_context: &[Stmt], out: &mut RenderedOutput) {
        let mut context = base_context.to_vec();
        for stmt in stmts {
            self.walk_stmt(stmt, &context, out);
            context.push(stmt.clone());
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt, context: &[Stmt], out: &mut RenderedOutput) {
        match stmt {
            Stmt::Val(val) => self.walk_val(val, context, out),
            Stmt::Def(def) => self.walk_def(def, context, out),
            Stmt::Type(ty) => self.walk_type(ty, context, out),
            Stmt::Object(obj) => self.walk_object(obj, context, out),
            Stmt::Expr(expr) => match &expr.kind {
                ExprKind::Block(stmts) => self.walk_stmts(stmts, context, out),
                _ => self.walk_expr(expr, context, out),
            },
            Stmt::Empty(_) => {}
        }
    }

    /// `val x = rhs`. Trivial right-hand sides restate the source, so they
    /// produce no output; everything else renders as `x = value`.
    fn walk_val(&mut self, val: &ValDef, context: &[Stmt], out: &mut RenderedOutput) {
        let Some(init) = &val.init else { return };
        if matches!(init.kind, ExprKind::Unimplemented) || is_simple_expr(init) {
            return;
        }
        let annotation = Annotation {
            line: val.span.start_line,
            kind: AnnotationKind::Value {
                name: val.name.name.clone(),
                declared_type: val.declared_type.as_ref().map(|ty| ty.to_string()),
                inner: Box::new(self.eval_inner(context, init)),
            },
        };
        out.merge(annotation.line, &annotation.render());
    }

    /// `def f(params) = body`. The function is auto-invoked with sampled
    /// arguments; block bodies additionally get their inner lines walked.
    fn walk_def(&mut self, def: &DefDef, context: &[Stmt], out: &mut RenderedOutput) {
        let Some(body) = &def.body else { return };
        if is_simple_expr(body) {
            return;
        }
        let unimplemented = matches!(body.kind, ExprKind::Unimplemented);
        if unimplemented && def.param_count() == 0 {
            return;
        }
        let Some(groups) = sample_params(&def.param_groups, context, &mut self.pool) else {
            return;
        };

        let mut body_context = context.to_vec();
        body_context.push(Stmt::Def(def.clone()));
        for group in &groups {
            for (name, value) in group {
                body_context.push(param_binding(name, value));
            }
        }

        let inner = if unimplemented {
            AnnotationKind::NotImplemented
        } else {
            self.eval_inner(&body_context, body)
        };
        let annotation = Annotation {
            line: def.span.start_line,
            kind: AnnotationKind::Function {
                signature: synthesized_signature(&def.name.name, &groups),
                inner: Box::new(inner),
            },
        };
        out.merge(annotation.line, &annotation.render());

        if let ExprKind::Block(stmts) = &body.kind {
            self.walk_stmts(stmts, &body_context, out);
        }
    }

    /// Concrete classes are instantiated with sampled constructor arguments
    /// and their bodies walked with those bindings in scope. A class whose
    /// body produces nothing visible is suppressed entirely; otherwise the
    /// body lines are wrapped in a `Name(arg = sample) {` header and a `}`
    /// on the line after the last visible body line.
    fn walk_type(&mut self, ty: &TypeDef, context: &[Stmt], out: &mut RenderedOutput) {
        if !ty.is_concrete() {
            return;
        }
        let Some(groups) = sample_params(std::slice::from_ref(&ty.params), context, &mut self.pool)
        else {
            return;
        };
        let params = groups.into_iter().next().unwrap_or_default();

        let mut body_context = context.to_vec();
        body_context.push(Stmt::Type(ty.clone()));
        for (name, value) in &params {
            body_context.push(param_binding(name, value));
        }

        let mut body_out = RenderedOutput::new(out.line_count());
        self.walk_stmts(&ty.members, &body_context, &mut body_out);
        if !body_out.has_content() {
            return;
        }
        merge_wrapped(
            &type_header(&ty.name.name, &params),
            ty.span.start_line,
            &body_out,
            out,
        );
    }

    /// Objects need no construction; the body is walked with the object
    /// itself in scope and wrapped in `Name {` when anything is visible.
    fn walk_object(&mut self, obj: &ObjectDef, context: &[Stmt], out: &mut RenderedOutput) {
        let mut body_context = context.to_vec();
        body_context.push(Stmt::Object(obj.clone()));

        let mut body_out = RenderedOutput::new(out.line_count());
        self.walk_stmts(&obj.members, &body_context, &mut body_out);
        if !body_out.has_content() {
            return;
        }
        merge_wrapped(
            &format!("{} {{", obj.name.name),
            obj.span.start_line,
            &body_out,
            out,
        );
    }

    /// A bare expression renders its value, or nothing when the value is
    /// unit, or `throws <message>` when evaluation fails.
    fn walk_expr(&mut self, expr: &Expr, context: &[Stmt], out: &mut RenderedOutput) {
        if is_simple_expr(expr) {
            return;
        }
        let kind = match self.oracle.evaluate(context, expr) {
            Ok(Evaluated::Value(value)) => AnnotationKind::Expression { value },
            Ok(Evaluated::Unit) => return,
            Err(err) => AnnotationKind::Error {
                message: err.to_string(),
            },
        };
        let annotation = Annotation {
            line: expr.span.start_line,
            kind,
        };
        out.merge(annotation.line, &annotation.render());
    }

    fn eval_inner(&mut self, context: &[Stmt], expr: &Expr) -> AnnotationKind {
        match self.oracle.evaluate(context, expr) {
            Ok(Evaluated::Value(value)) => AnnotationKind::PlainValue { value },
            Ok(Evaluated::Unit) => AnnotationKind::PlainValue {
                value: "()".to_string(),
            },
            Err(err) => AnnotationKind::Error {
                message: err.to_string(),
            },
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// A bare literal or a constructor application over simple expressions.
/// These restate the source, so the walker suppresses them. Constructor
/// calls are recognized by their capitalized callee.
fn is_simple_expr(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::IntLit(_)
        | ExprKind::LongLit(_)
        | ExprKind::DoubleLit(_)
        | ExprKind::FloatLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::CharLit(_)
        | ExprKind::StrLit(_) => true,
        ExprKind::Call { callee, args } => {
            is_ctor_name(callee) && args.iter().all(is_simple_expr)
        }
        ExprKind::New { args, body, .. } => body.is_none() && args.iter().all(is_simple_expr),
        ExprKind::Paren(inner) => is_simple_expr(inner),
        _ => false,
    }
}

fn is_ctor_name(callee: &Expr) -> bool {
    match &callee.kind {
        ExprKind::Name(name) => name.chars().next().is_some_and(char::is_uppercase),
        _ => false,
    }
}

/// A synthetic `val name = value` used to put a sampled parameter in scope
/// for body evaluation.
fn param_binding(name: &str, value: &Expr) -> Stmt {
    Stmt::Val(ValDef {
        name: Ident::new(name, Span::synthetic()),
        declared_type: None,
        init: Some(value.clone()),
        span: Span::synthetic(),
    })
}

/// `name(a = 3, b = "foo")(c = 5)`, one parenthesized list per group.
fn synthesized_signature(name: &str, groups: &[Vec<(String, Expr)>]) -> String {
    let mut sig = String::from(name);
    for group in groups {
        let args: Vec<String> = group.iter().map(|(n, v)| format!("{n} = {v}")).collect();
        sig.push('(');
        sig.push_str(&args.join(", "));
        sig.push(')');
    }
    sig
}

fn type_header(name: &str, params: &[(String, Expr)]) -> String {
    if params.is_empty() {
        format!("{name} {{")
    } else {
        let args: Vec<String> = params.iter().map(|(n, v)| format!("{n} = {v}")).collect();
        format!("{}({}) {{", name, args.join(", "))
    }
}

/// Merges a walked body into `out` under its header, closing with `}` on
/// the line after the last visible body line. A close that would fall past
/// the end of the table is dropped with it.
fn merge_wrapped(
    header: &str,
    header_line: u32,
    body_out: &RenderedOutput,
    out: &mut RenderedOutput,
) {
    out.merge(header_line, header);
    let close_line = body_out.last_content_line().map(|l| l + 1);
    for line in 1..=body_out.line_count() as u32 {
        out.merge(line, body_out.line(line));
    }
    if let Some(line) = close_line {
        out.merge(line, "}");
    }
}
