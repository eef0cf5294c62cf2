//! Slate parser: converts a token stream into a worksheet AST.

mod parse_decl;
mod parse_expr;
mod parse_type;
mod parser;

pub use parser::{ParseResult, Parser};
