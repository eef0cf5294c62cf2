//! Source-form rendering of AST nodes.
//!
//! Synthesized arguments are echoed back into annotations in the same
//! notation the user would have typed, so `Display` here must produce
//! valid worksheet syntax: `42L`, `2.5f`, `List(3, 5, 7)`,
//! `new Greeter { def greet(name: String): String = "foo" }`.

use crate::ast::{DefDef, Expr, ExprKind, Param, Stmt, TypeDef, TypeExpr, TypeKind, ValDef};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::IntLit(n) => write!(f, "{n}"),
            ExprKind::LongLit(n) => write!(f, "{n}L"),
            ExprKind::DoubleLit(x) => write!(f, "{}", fmt_f64(*x)),
            ExprKind::FloatLit(x) => write!(f, "{}f", fmt_f64(*x as f64)),
            ExprKind::BoolLit(b) => write!(f, "{b}"),
            ExprKind::CharLit(c) => write!(f, "'{}'", escape_char(*c)),
            ExprKind::StrLit(s) => write!(f, "\"{}\"", escape_str(s)),
            ExprKind::Unimplemented => write!(f, "???"),
            ExprKind::Name(n) => write!(f, "{n}"),
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_joined(f, args, ", ")?;
                write!(f, ")")
            }
            ExprKind::Select { receiver, name } => write!(f, "{receiver}.{}", name.name),
            ExprKind::New { class, args, body } => {
                write!(f, "new {}", class.name)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    write_joined(f, args, ", ")?;
                    write!(f, ")")?;
                }
                if let Some(members) = body {
                    if members.is_empty() {
                        write!(f, " {{}}")?;
                    } else {
                        write!(f, " {{ ")?;
                        write_joined(f, members, "; ")?;
                        write!(f, " }}")?;
                    }
                }
                Ok(())
            }
            ExprKind::Binary { left, op, right } => {
                write!(f, "{left} {} {right}", op.as_str())
            }
            ExprKind::Unary { op, operand } => write!(f, "{}{operand}", op.as_str()),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "if ({cond}) {then_branch}")?;
                if let Some(e) = else_branch {
                    write!(f, " else {e}")?;
                }
                Ok(())
            }
            ExprKind::Block(stmts) => {
                if stmts.is_empty() {
                    write!(f, "{{}}")
                } else {
                    write!(f, "{{ ")?;
                    write_joined(f, stmts, "; ")?;
                    write!(f, " }}")
                }
            }
            ExprKind::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Val(v) => v.fmt(f),
            Stmt::Def(d) => d.fmt(f),
            Stmt::Type(t) => t.fmt(f),
            Stmt::Object(o) => {
                write!(f, "object {}", o.name.name)?;
                write_members(f, &o.members)
            }
            Stmt::Expr(e) => e.fmt(f),
            Stmt::Empty(_) => Ok(()),
        }
    }
}

impl fmt::Display for ValDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "val {}", self.name.name)?;
        if let Some(ty) = &self.declared_type {
            write!(f, ": {ty}")?;
        }
        if let Some(init) = &self.init {
            write!(f, " = {init}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DefDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}", self.name.name)?;
        for group in &self.param_groups {
            write!(f, "(")?;
            write_joined(f, group, ", ")?;
            write!(f, ")")?;
        }
        if let Some(ty) = &self.declared_type {
            write!(f, ": {ty}")?;
        }
        if let Some(body) = &self.body {
            write!(f, " = {body}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_abstract {
            write!(f, "abstract ")?;
        }
        if self.is_case {
            write!(f, "case ")?;
        }
        if self.is_trait {
            write!(f, "trait {}", self.name.name)?;
        } else {
            write!(f, "class {}", self.name.name)?;
        }
        if !self.params.is_empty() {
            write!(f, "(")?;
            write_joined(f, &self.params, ", ")?;
            write!(f, ")")?;
        }
        for (i, parent) in self.parents.iter().enumerate() {
            if i == 0 {
                write!(f, " extends {}", parent.name)?;
            } else {
                write!(f, " with {}", parent.name)?;
            }
        }
        write_members(f, &self.members)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name.name, self.declared_type)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Name(n) => write!(f, "{n}"),
            TypeKind::Applied { head, args } => {
                write!(f, "{head}[")?;
                write_joined(f, args, ", ")?;
                write!(f, "]")
            }
            TypeKind::UpperBounded(bound) => write!(f, "_ <: {bound}"),
            TypeKind::Function { param, ret } => write!(f, "{param} => {ret}"),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[Stmt]) -> fmt::Result {
    if members.is_empty() {
        return Ok(());
    }
    write!(f, " {{ ")?;
    write_joined(f, members, "; ")?;
    write!(f, " }}")
}

/// Format an f64 so the result still reads as a floating literal.
///
/// Rust's `Display` drops the fractional part of whole doubles (`3.0`
/// prints as `3`), which would change the literal's type on re-read.
fn fmt_f64(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

fn escape_char(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        '\\' => "\\\\".to_string(),
        '\'' => "\\'".to_string(),
        other => other.to_string(),
    }
}

fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, Ident};
    use crate::Span;

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::synthetic())
    }

    fn ty(kind: TypeKind) -> TypeExpr {
        TypeExpr::new(kind, Span::synthetic())
    }

    fn ident(name: &str) -> Ident {
        Ident::new(name, Span::synthetic())
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(expr(ExprKind::IntLit(42)).to_string(), "42");
        assert_eq!(expr(ExprKind::LongLit(42)).to_string(), "42L");
        assert_eq!(expr(ExprKind::DoubleLit(2.5)).to_string(), "2.5");
        assert_eq!(expr(ExprKind::DoubleLit(3.0)).to_string(), "3.0");
        assert_eq!(expr(ExprKind::FloatLit(2.5)).to_string(), "2.5f");
        assert_eq!(expr(ExprKind::BoolLit(true)).to_string(), "true");
        assert_eq!(expr(ExprKind::CharLit('f')).to_string(), "'f'");
        assert_eq!(
            expr(ExprKind::StrLit("foo".to_string())).to_string(),
            "\"foo\""
        );
        assert_eq!(expr(ExprKind::Unimplemented).to_string(), "???");
    }

    #[test]
    fn test_escaped_literals() {
        assert_eq!(expr(ExprKind::CharLit('\n')).to_string(), "'\\n'");
        assert_eq!(
            expr(ExprKind::StrLit("a\"b\\c".to_string())).to_string(),
            "\"a\\\"b\\\\c\""
        );
    }

    #[test]
    fn test_call_display() {
        let call = expr(ExprKind::Call {
            callee: Box::new(expr(ExprKind::Name("List".to_string()))),
            args: vec![
                expr(ExprKind::IntLit(3)),
                expr(ExprKind::IntLit(5)),
                expr(ExprKind::IntLit(7)),
            ],
        });
        assert_eq!(call.to_string(), "List(3, 5, 7)");
    }

    #[test]
    fn test_binary_display() {
        let sum = expr(ExprKind::Binary {
            left: Box::new(expr(ExprKind::Name("x".to_string()))),
            op: BinOp::Mul,
            right: Box::new(expr(ExprKind::IntLit(2))),
        });
        assert_eq!(sum.to_string(), "x * 2");
    }

    #[test]
    fn test_new_with_body_display() {
        let member = Stmt::Def(DefDef {
            name: ident("greet"),
            param_groups: vec![vec![Param {
                name: ident("name"),
                declared_type: ty(TypeKind::Name("String".to_string())),
                default: None,
                span: Span::synthetic(),
            }]],
            declared_type: Some(ty(TypeKind::Name("String".to_string()))),
            body: Some(expr(ExprKind::StrLit("foo".to_string()))),
            span: Span::synthetic(),
        });
        let anon = expr(ExprKind::New {
            class: ident("Greeter"),
            args: vec![],
            body: Some(vec![member]),
        });
        assert_eq!(
            anon.to_string(),
            "new Greeter { def greet(name: String): String = \"foo\" }"
        );
    }

    #[test]
    fn test_new_without_args_display() {
        let plain = expr(ExprKind::New {
            class: ident("Dog"),
            args: vec![],
            body: None,
        });
        assert_eq!(plain.to_string(), "new Dog");
    }

    #[test]
    fn test_type_display() {
        assert_eq!(ty(TypeKind::Name("Int".to_string())).to_string(), "Int");
        let applied = ty(TypeKind::Applied {
            head: "List".to_string(),
            args: vec![ty(TypeKind::Name("Int".to_string()))],
        });
        assert_eq!(applied.to_string(), "List[Int]");
        let bounded = ty(TypeKind::UpperBounded(Box::new(ty(TypeKind::Name(
            "Animal".to_string(),
        )))));
        assert_eq!(bounded.to_string(), "_ <: Animal");
        let func = ty(TypeKind::Function {
            param: Box::new(ty(TypeKind::Name("Int".to_string()))),
            ret: Box::new(ty(TypeKind::Name("String".to_string()))),
        });
        assert_eq!(func.to_string(), "Int => String");
    }

    #[test]
    fn test_val_display() {
        let v = Stmt::Val(ValDef {
            name: ident("x"),
            declared_type: Some(ty(TypeKind::Name("Int".to_string()))),
            init: Some(expr(ExprKind::IntLit(3))),
            span: Span::synthetic(),
        });
        assert_eq!(v.to_string(), "val x: Int = 3");

        let abstract_member = Stmt::Val(ValDef {
            name: ident("size"),
            declared_type: Some(ty(TypeKind::Name("Int".to_string()))),
            init: None,
            span: Span::synthetic(),
        });
        assert_eq!(abstract_member.to_string(), "val size: Int");
    }

    #[test]
    fn test_curried_def_display() {
        let d = Stmt::Def(DefDef {
            name: ident("add"),
            param_groups: vec![
                vec![Param {
                    name: ident("a"),
                    declared_type: ty(TypeKind::Name("Int".to_string())),
                    default: None,
                    span: Span::synthetic(),
                }],
                vec![Param {
                    name: ident("b"),
                    declared_type: ty(TypeKind::Name("Int".to_string())),
                    default: None,
                    span: Span::synthetic(),
                }],
            ],
            declared_type: None,
            body: Some(expr(ExprKind::Binary {
                left: Box::new(expr(ExprKind::Name("a".to_string()))),
                op: BinOp::Add,
                right: Box::new(expr(ExprKind::Name("b".to_string()))),
            })),
            span: Span::synthetic(),
        });
        assert_eq!(d.to_string(), "def add(a: Int)(b: Int) = a + b");
    }
}
