//! Type annotation parsing.
//!
//! Grammar:
//!
//! ```text
//! Type       = SimpleType [ "=>" Type ]
//! SimpleType = "_" "<:" Type
//!            | Name [ "[" Type { "," Type } "]" ]
//! ```
//!
//! `=>` is right-associative, so `Int => Int => String` reads as
//! `Int => (Int => String)`.

use slate_lexer::token::TokenKind;
use slate_types::ast::{TypeExpr, TypeKind};
use slate_types::DiagCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a type annotation.
    pub(crate) fn parse_type_expr(&mut self) -> Option<TypeExpr> {
        let left = self.parse_simple_type()?;
        if self.eat(&TokenKind::FatArrow) {
            self.skip_newlines();
            let ret = self.parse_type_expr()?;
            let span = left.span.merge(ret.span);
            return Some(TypeExpr::new(
                TypeKind::Function {
                    param: Box::new(left),
                    ret: Box::new(ret),
                },
                span,
            ));
        }
        Some(left)
    }

    fn parse_simple_type(&mut self) -> Option<TypeExpr> {
        let start = self.current_span();

        // `_ <: Animal`
        if self.eat(&TokenKind::Underscore) {
            if !self.eat(&TokenKind::Subtype) {
                self.error_at_current(
                    DiagCode::EXPECTED_TYPE,
                    "expected '<:' after '_' in a bounded type",
                );
                return None;
            }
            let bound = self.parse_simple_type()?;
            let span = start.merge(bound.span);
            return Some(TypeExpr::new(TypeKind::UpperBounded(Box::new(bound)), span));
        }

        let name = match self.peek_kind() {
            TokenKind::Identifier(name) => name.clone(),
            other => {
                let message = format!("expected a type name, got '{other}'");
                self.error_at_current(DiagCode::EXPECTED_TYPE, message);
                return None;
            }
        };
        self.advance();

        // `List[Int]`, `Option[String]`
        if self.eat(&TokenKind::LBracket) {
            self.skip_newlines();
            let mut args = Vec::new();
            while !self.check(&TokenKind::RBracket) && !self.at_end() {
                args.push(self.parse_type_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
            self.expect(&TokenKind::RBracket)?;
            let span = start.merge(self.previous_span());
            return Some(TypeExpr::new(TypeKind::Applied { head: name, args }, span));
        }

        Some(TypeExpr::new(TypeKind::Name(name), start))
    }
}
