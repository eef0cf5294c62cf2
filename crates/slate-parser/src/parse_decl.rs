//! Statement and declaration parsing.
//!
//! Handles `val`, `def`, class/trait/object declarations, and bare
//! expression statements, at the top level of a fragment as well as
//! inside blocks and type bodies.

use slate_lexer::token::TokenKind;
use slate_types::ast::*;
use slate_types::DiagCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Fragment
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a complete fragment: a sequence of statements.
    ///
    /// Lone semicolons reach [`Parser::parse_stmt`] and come back as
    /// [`Stmt::Empty`], so only newlines are skipped between statements.
    pub(crate) fn parse_fragment(&mut self) -> Option<Fragment> {
        let start = self.current_span();
        self.skip_newlines();

        let mut stmts = Vec::new();
        while !self.at_end() {
            if self.too_many_diags() {
                break;
            }
            match self.parse_stmt(false) {
                Some(stmt) => {
                    stmts.push(stmt);
                    self.expect_statement_end();
                }
                None => self.synchronize(),
            }
            self.skip_newlines();
        }

        let span = start.merge(self.previous_span());
        Some(Fragment { stmts, span })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a single statement.
    ///
    /// `in_type_body` is `true` inside class, trait, and object bodies,
    /// where member declarations may omit their initializer or body.
    pub(crate) fn parse_stmt(&mut self, in_type_body: bool) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Val => self.parse_val(in_type_body).map(Stmt::Val),
            TokenKind::Def => self.parse_def(in_type_body).map(Stmt::Def),
            TokenKind::Class | TokenKind::Trait | TokenKind::Case | TokenKind::Abstract => {
                self.parse_type_def().map(Stmt::Type)
            }
            TokenKind::Object => self.parse_object().map(Stmt::Object),
            TokenKind::Semi => {
                let span = self.advance().span;
                Some(Stmt::Empty(span))
            }
            _ => self.parse_expression().map(Stmt::Expr),
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Value Definitions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `val name[: Type] [= expr]`.
    fn parse_val(&mut self, in_type_body: bool) -> Option<ValDef> {
        let start = self.current_span();
        self.expect(&TokenKind::Val)?;
        let name = self.expect_identifier("a name after 'val'")?;

        let declared_type = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type_expr()?)
        } else {
            None
        };

        let init = if self.eat(&TokenKind::Eq) {
            self.skip_newlines();
            Some(self.parse_expression()?)
        } else {
            if !in_type_body {
                self.error_at(
                    DiagCode::MISSING_INITIALIZER,
                    format!("value '{}' needs an initializer", name.name),
                    start.merge(self.previous_span()),
                );
            } else if declared_type.is_none() {
                self.error_at(
                    DiagCode::EXPECTED_TYPE,
                    format!("abstract value '{}' needs a declared type", name.name),
                    start.merge(self.previous_span()),
                );
            }
            None
        };

        let span = start.merge(self.previous_span());
        Some(ValDef {
            name,
            declared_type,
            init,
            span,
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Function Definitions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `def name[(params)]...[: Type] [= expr]`.
    fn parse_def(&mut self, in_type_body: bool) -> Option<DefDef> {
        let start = self.current_span();
        self.expect(&TokenKind::Def)?;
        let name = self.expect_identifier("a name after 'def'")?;

        let mut param_groups = Vec::new();
        while self.check(&TokenKind::LParen) {
            param_groups.push(self.parse_param_group()?);
        }

        let declared_type = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type_expr()?)
        } else {
            None
        };

        let body = if self.eat(&TokenKind::Eq) {
            self.skip_newlines();
            Some(self.parse_expression()?)
        } else {
            if !in_type_body {
                self.error_at(
                    DiagCode::MISSING_BODY,
                    format!("method '{}' needs a body", name.name),
                    start.merge(self.previous_span()),
                );
            } else if declared_type.is_none() {
                self.error_at(
                    DiagCode::EXPECTED_TYPE,
                    format!("abstract method '{}' needs a declared result type", name.name),
                    start.merge(self.previous_span()),
                );
            }
            None
        };

        let span = start.merge(self.previous_span());
        Some(DefDef {
            name,
            param_groups,
            declared_type,
            body,
            span,
        })
    }

    /// Parse one parenthesized parameter list: `(a: Int, b: Int = 2)`.
    fn parse_param_group(&mut self) -> Option<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        self.skip_newlines();

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            params.push(self.parse_param()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }

        self.skip_newlines();
        self.expect(&TokenKind::RParen)?;
        Some(params)
    }

    /// Parse `name: Type [= default]`.
    fn parse_param(&mut self) -> Option<Param> {
        let start = self.current_span();
        let name = self.expect_identifier("a parameter name")?;
        self.expect(&TokenKind::Colon)?;
        let declared_type = self.parse_type_expr()?;
        let default = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Some(Param {
            name,
            declared_type,
            default,
            span,
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Type Definitions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a class, case class, abstract class, or trait declaration.
    fn parse_type_def(&mut self) -> Option<TypeDef> {
        let start = self.current_span();
        let is_abstract = self.eat(&TokenKind::Abstract);
        let is_case = self.eat(&TokenKind::Case);

        let is_trait = match self.peek_kind() {
            TokenKind::Class => {
                self.advance();
                false
            }
            TokenKind::Trait => {
                if is_case {
                    self.error_at_current(
                        DiagCode::UNEXPECTED_TOKEN,
                        "'case' cannot be applied to a trait",
                    );
                }
                self.advance();
                true
            }
            other => {
                self.error_at_current(
                    DiagCode::UNEXPECTED_TOKEN,
                    format!("expected 'class' or 'trait', got '{other}'"),
                );
                return None;
            }
        };

        let name = self.expect_identifier("a type name")?;

        let params = if self.check(&TokenKind::LParen) {
            if is_trait {
                self.error_at_current(
                    DiagCode::UNEXPECTED_TOKEN,
                    format!("trait '{}' cannot have constructor parameters", name.name),
                );
            }
            self.parse_param_group()?
        } else {
            Vec::new()
        };

        let parents = self.parse_parents()?;

        let members = if self.check(&TokenKind::LBrace) {
            self.parse_member_block(true)?
        } else {
            Vec::new()
        };

        let span = start.merge(self.previous_span());
        Some(TypeDef {
            name,
            is_trait,
            is_abstract,
            is_case,
            params,
            parents,
            members,
            span,
        })
    }

    /// Parse `object Name [{ members }]`.
    fn parse_object(&mut self) -> Option<ObjectDef> {
        let start = self.current_span();
        self.expect(&TokenKind::Object)?;
        let name = self.expect_identifier("a name after 'object'")?;

        let members = if self.check(&TokenKind::LBrace) {
            self.parse_member_block(true)?
        } else {
            Vec::new()
        };

        let span = start.merge(self.previous_span());
        Some(ObjectDef {
            name,
            members,
            span,
        })
    }

    /// Parse `[extends Parent [with Parent]*]`.
    ///
    /// Parent constructor arguments (`extends C(3)`) are accepted and
    /// discarded: the parent's fields simply stay unbound, which surfaces
    /// later as an evaluation error if a member depends on them.
    fn parse_parents(&mut self) -> Option<Vec<Ident>> {
        let mut parents = Vec::new();
        if !self.eat(&TokenKind::Extends) {
            return Some(parents);
        }
        loop {
            let parent = self.expect_identifier("a parent type name")?;
            if self.check(&TokenKind::LParen) {
                self.parse_call_args()?;
            }
            parents.push(parent);
            if !self.eat(&TokenKind::With) {
                break;
            }
        }
        Some(parents)
    }

    /// Parse `{ members... }` for type bodies, object bodies, and
    /// anonymous refinements.
    ///
    /// `allow_abstract` is `false` for anonymous refinement bodies, which
    /// must implement every member they declare.
    pub(crate) fn parse_member_block(&mut self, allow_abstract: bool) -> Option<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        self.skip_newlines();

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_diags() {
                break;
            }
            match self.parse_stmt(allow_abstract) {
                Some(stmt) => {
                    members.push(stmt);
                    if !self.check(&TokenKind::RBrace) {
                        self.expect_statement_end();
                    }
                }
                None => self.synchronize(),
            }
            self.skip_newlines();
        }

        self.expect(&TokenKind::RBrace)?;
        Some(members)
    }
}
