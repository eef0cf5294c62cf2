//! Token types for the Slate lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in the worksheet language
//! and [`Token`], which pairs a kind with a source [`Span`].

use slate_types::Span;
use std::fmt;

/// All reserved identifiers in the worksheet language.
///
/// These cannot be used as user-defined names. The lexer recognises each
/// one and emits a specific keyword token instead of [`TokenKind::Identifier`].
pub const ALL_KEYWORDS: &[&str] = &[
    "val", "def", "class", "trait", "object", "extends", "with", "new", "case", "abstract",
    "if", "else", "true", "false",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the Slate lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the worksheet language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// `42`
    IntLit(i32),
    /// `42L`
    LongLit(i64),
    /// `2.5`
    DoubleLit(f64),
    /// `2.5f`
    FloatLit(f32),
    /// `"hello"`
    StrLit(String),
    /// `'a'`
    CharLit(char),
    /// `true`
    True,
    /// `false`
    False,

    // ── Identifiers ──────────────────────────────────────────

    /// User-defined identifier: `x`, `Greeter`, `toUpperCase`
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────

    /// `val`
    Val,
    /// `def`
    Def,
    /// `class`
    Class,
    /// `trait`
    Trait,
    /// `object`
    Object,
    /// `extends`
    Extends,
    /// `with`
    With,
    /// `new`
    New,
    /// `case`
    Case,
    /// `abstract`
    Abstract,
    /// `if`
    If,
    /// `else`
    Else,

    // ── Operators ────────────────────────────────────────────

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `=`
    Eq,
    /// `=>`
    FatArrow,
    /// `<:` (upper type bound)
    Subtype,
    /// `???` (unimplemented placeholder)
    Unimplemented,

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semi,
    /// `.`
    Dot,
    /// `_` (existential type wildcard)
    Underscore,

    // ── Special ──────────────────────────────────────────────

    /// Newline (statement separator)
    Newline,
    /// End of file
    Eof,
}

impl TokenKind {
    /// Look up a reserved identifier. Returns `Some(kind)` for reserved
    /// words, `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "val" => TokenKind::Val,
            "def" => TokenKind::Def,
            "class" => TokenKind::Class,
            "trait" => TokenKind::Trait,
            "object" => TokenKind::Object,
            "extends" => TokenKind::Extends,
            "with" => TokenKind::With,
            "new" => TokenKind::New,
            "case" => TokenKind::Case,
            "abstract" => TokenKind::Abstract,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        })
    }

    /// Returns `true` if this token kind is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Val
                | TokenKind::Def
                | TokenKind::Class
                | TokenKind::Trait
                | TokenKind::Object
                | TokenKind::Extends
                | TokenKind::With
                | TokenKind::New
                | TokenKind::Case
                | TokenKind::Abstract
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::True
                | TokenKind::False
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Literals
            TokenKind::IntLit(n) => write!(f, "{n}"),
            TokenKind::LongLit(n) => write!(f, "{n}L"),
            TokenKind::DoubleLit(x) => write!(f, "{x}"),
            TokenKind::FloatLit(x) => write!(f, "{x}f"),
            TokenKind::StrLit(s) => write!(f, "\"{s}\""),
            TokenKind::CharLit(c) => write!(f, "'{c}'"),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            // Identifiers
            TokenKind::Identifier(s) => f.write_str(s),
            // Keywords display as their source text
            TokenKind::Val => f.write_str("val"),
            TokenKind::Def => f.write_str("def"),
            TokenKind::Class => f.write_str("class"),
            TokenKind::Trait => f.write_str("trait"),
            TokenKind::Object => f.write_str("object"),
            TokenKind::Extends => f.write_str("extends"),
            TokenKind::With => f.write_str("with"),
            TokenKind::New => f.write_str("new"),
            TokenKind::Case => f.write_str("case"),
            TokenKind::Abstract => f.write_str("abstract"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            // Operators
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::AmpAmp => f.write_str("&&"),
            TokenKind::PipePipe => f.write_str("||"),
            TokenKind::Bang => f.write_str("!"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::FatArrow => f.write_str("=>"),
            TokenKind::Subtype => f.write_str("<:"),
            TokenKind::Unimplemented => f.write_str("???"),
            // Punctuation
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Semi => f.write_str(";"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Underscore => f.write_str("_"),
            // Special
            TokenKind::Newline => f.write_str("newline"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
