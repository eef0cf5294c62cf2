//! AST node types for the Slate worksheet language.
//!
//! Every node carries a [`Span`] so annotations can be attached to the
//! source line a statement starts on. Large recursive types are boxed to
//! keep enum sizes reasonable. Declaration members stay in source order.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete worksheet fragment: the unit of one annotation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement at the top level of a fragment, inside a block, or inside
/// the body of a class, trait, or object.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `val name[: Type] [= expr]`; the initializer is absent only for
    /// abstract members of traits and abstract classes.
    Val(ValDef),
    /// `def name[(params)...][: Type] [= expr]`
    Def(DefDef),
    /// `class` / `case class` / `abstract class` / `trait`
    Type(TypeDef),
    /// `object Name { members }`
    Object(ObjectDef),
    /// A bare expression statement.
    Expr(Expr),
    /// A lone `;` or an empty line between statements.
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Val(v) => v.span,
            Stmt::Def(d) => d.span,
            Stmt::Type(t) => t.span,
            Stmt::Object(o) => o.span,
            Stmt::Expr(e) => e.span,
            Stmt::Empty(span) => *span,
        }
    }

    /// The 1-based source line this statement starts on.
    pub fn line(&self) -> u32 {
        self.span().start_line
    }
}

/// `val name[: Type] [= expr]`
#[derive(Debug, Clone, PartialEq)]
pub struct ValDef {
    pub name: Ident,
    pub declared_type: Option<TypeExpr>,
    /// `None` for abstract members (`val x: Int` with no `=` in a trait).
    pub init: Option<Expr>,
    pub span: Span,
}

/// `def name(a: Int)(b: Int): Int = body`
#[derive(Debug, Clone, PartialEq)]
pub struct DefDef {
    pub name: Ident,
    /// One entry per parameter list. `def f = 1` has no entry at all,
    /// `def f() = 1` has one empty entry.
    pub param_groups: Vec<Vec<Param>>,
    pub declared_type: Option<TypeExpr>,
    /// `None` for abstract members (`def f(x: Int): Int` with no body).
    pub body: Option<Expr>,
    pub span: Span,
}

impl DefDef {
    /// Total parameter count across all parameter lists.
    pub fn param_count(&self) -> usize {
        self.param_groups.iter().map(Vec::len).sum()
    }
}

/// A parameter: `name: Type [= default]`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub declared_type: TypeExpr,
    pub default: Option<Expr>,
    pub span: Span,
}

/// A class, case class, abstract class, or trait declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: Ident,
    pub is_trait: bool,
    pub is_abstract: bool,
    pub is_case: bool,
    /// Primary constructor parameters. Always empty for traits.
    pub params: Vec<Param>,
    /// `extends P with Q` parent names, in source order.
    pub parents: Vec<Ident>,
    pub members: Vec<Stmt>,
    pub span: Span,
}

impl TypeDef {
    /// A concrete type can be instantiated directly with `new`.
    pub fn is_concrete(&self) -> bool {
        !self.is_trait && !self.is_abstract
    }

    /// Whether `name` appears in this type's `extends` clause.
    pub fn has_parent(&self, name: &str) -> bool {
        self.parents.iter().any(|p| p.name == name)
    }
}

/// `object Name { members }`, a singleton module.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
    pub name: Ident,
    pub members: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `42`
    IntLit(i32),
    /// `42L`
    LongLit(i64),
    /// `2.5`
    DoubleLit(f64),
    /// `2.5f`
    FloatLit(f32),
    /// `true` / `false`
    BoolLit(bool),
    /// `'a'`
    CharLit(char),
    /// `"hello"`
    StrLit(String),
    /// `???`, the not-yet-implemented placeholder
    Unimplemented,

    // ── Names & Calls ──
    /// `x`, `List`, `None`
    Name(String),
    /// `callee(args...)`: covers function calls, constructor sugar like
    /// `List(1, 2)`, and the outer list of a curried call `f(1)(2)`.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// `expr.name`
    Select { receiver: Box<Expr>, name: Ident },
    /// `new C(args)` or `new T { members }`
    New {
        class: Ident,
        args: Vec<Expr>,
        /// Present for anonymous refinements: `new Greeter { ... }`.
        body: Option<Vec<Stmt>>,
    },

    // ── Operators ──
    /// `a + b`, `a == b`, `a && b`, etc.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `-x`, `!x`
    Unary { op: UnaryOp, operand: Box<Expr> },

    // ── Control & Grouping ──
    /// `if (cond) a else b`
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    /// `{ stmts... }`; value is the last expression statement.
    Block(Vec<Stmt>),
    /// `(expr)`
    Paren(Box<Expr>),
}

/// Binary operators (in precedence order, lowest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Comparison
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Returns the operator symbol for rendering and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Type Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A type annotation in worksheet source.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The head name of this type, if it has one (`List[Int]` → `List`).
    pub fn head_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Name(n) => Some(n),
            TypeKind::Applied { head, .. } => Some(head),
            _ => None,
        }
    }
}

/// The kind of type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `Int`, `String`, `Animal`
    Name(String),
    /// `List[Int]`, `Option[String]`
    Applied {
        head: String,
        args: Vec<TypeExpr>,
    },
    /// `_ <: Animal` existential with an upper bound
    UpperBounded(Box<TypeExpr>),
    /// `Int => String`; parsed so annotated code loads, never sampled
    Function {
        param: Box<TypeExpr>,
        ret: Box<TypeExpr>,
    },
}
