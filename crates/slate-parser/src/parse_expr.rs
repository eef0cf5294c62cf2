//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 7. `||`
//! 6. `&&`
//! 5. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 4. `+`, `-`
//! 3. `*`, `/`, `%`
//! 2. unary `-`, `!`
//! 1. `.` (selection), `()` (application)
//!
//! A newline before an operator ends the statement; a newline after an
//! operator continues it, matching how worksheet authors split long
//! expressions.

use slate_lexer::token::TokenKind;
use slate_types::ast::*;
use slate_types::DiagCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > 16 {
            self.error_at_current(
                DiagCode::EXPECTED_EXPRESSION,
                "maximum expression nesting depth is 16",
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_or();
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "||" AndExpr }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::PipePipe) {
            self.skip_newlines();
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::Or,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `AndExpr = CompExpr { "&&" CompExpr }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::AmpAmp) {
            self.skip_newlines();
            let right = self.parse_comparison()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::And,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `CompExpr = AddExpr [ CompOp AddExpr ]`
    ///
    /// Comparison operators do NOT chain: `a < b < c` is a parse error.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_add()?;
        if let Some(op) = self.match_comparison_op() {
            self.advance(); // consume operator
            self.skip_newlines();
            let right = self.parse_add()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
            // Reject chaining
            if self.match_comparison_op().is_some() {
                self.error_at_current(
                    DiagCode::UNEXPECTED_TOKEN,
                    "comparison operators cannot be chained; use '&&' to combine: a < b && b < c",
                );
            }
        }
        Some(left)
    }

    /// Check if current token is a comparison operator, return corresponding BinOp.
    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Option<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.skip_newlines();
            let right = self.parse_mul()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            self.skip_newlines();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `UnaryExpr = [ "!" | "-" ] PostfixExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Bang => {
                self.advance();
                Some(UnaryOp::Not)
            }
            TokenKind::Minus => {
                self.advance();
                Some(UnaryOp::Neg)
            }
            _ => None,
        };
        let operand = self.parse_postfix()?;
        if let Some(op) = op {
            let span = start.merge(operand.span);
            Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ))
        } else {
            Some(operand)
        }
    }

    /// `PostfixExpr = Primary { "." Name | "(" Args ")" }`
    ///
    /// Method calls come out as `Call { callee: Select, .. }`, and a
    /// curried application `f(1)(2)` as nested `Call` nodes.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_identifier("a member name after '.'")?;
                    let span = expr.span.merge(name.span);
                    expr = Expr::new(
                        ExprKind::Select {
                            receiver: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Some(expr)
    }

    /// Parse a parenthesized argument list: `(expr, expr, ...)`.
    pub(crate) fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        self.skip_newlines();

        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }

        self.skip_newlines();
        self.expect(&TokenKind::RParen)?;
        Some(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();
        let kind = self.peek_kind().clone();
        match kind {
            TokenKind::IntLit(n) => {
                self.advance();
                Some(Expr::new(ExprKind::IntLit(n), span))
            }
            TokenKind::LongLit(n) => {
                self.advance();
                Some(Expr::new(ExprKind::LongLit(n), span))
            }
            TokenKind::DoubleLit(x) => {
                self.advance();
                Some(Expr::new(ExprKind::DoubleLit(x), span))
            }
            TokenKind::FloatLit(x) => {
                self.advance();
                Some(Expr::new(ExprKind::FloatLit(x), span))
            }
            TokenKind::StrLit(s) => {
                self.advance();
                Some(Expr::new(ExprKind::StrLit(s), span))
            }
            TokenKind::CharLit(c) => {
                self.advance();
                Some(Expr::new(ExprKind::CharLit(c), span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(true), span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(false), span))
            }
            TokenKind::Unimplemented => {
                self.advance();
                Some(Expr::new(ExprKind::Unimplemented, span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Expr::new(ExprKind::Name(name), span))
            }
            TokenKind::New => self.parse_new(),
            TokenKind::If => self.parse_if(),
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expression()?;
                self.skip_newlines();
                self.expect(&TokenKind::RParen)?;
                let full = span.merge(self.previous_span());
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), full))
            }
            TokenKind::LBrace => self.parse_block(),
            other => {
                self.error_at_current(
                    DiagCode::EXPECTED_EXPRESSION,
                    format!("expected an expression, got '{other}'"),
                );
                None
            }
        }
    }

    /// Parse `new Name[(args)] [{ members }]`.
    fn parse_new(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::New)?;
        let class = self.expect_identifier("a type name after 'new'")?;

        let args = if self.check(&TokenKind::LParen) {
            self.parse_call_args()?
        } else {
            Vec::new()
        };

        // Anonymous refinements must implement everything they declare.
        let body = if self.check(&TokenKind::LBrace) {
            Some(self.parse_member_block(false)?)
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::New { class, args, body }, span))
    }

    /// Parse `if (cond) expr [else expr]`. The `else` may sit on its own line.
    fn parse_if(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        self.skip_newlines();
        let cond = self.parse_expression()?;
        self.skip_newlines();
        self.expect(&TokenKind::RParen)?;
        self.skip_newlines();
        let then_branch = self.parse_expression()?;

        // Look across newlines for `else` without consuming a statement
        // separator that belongs to the enclosing block.
        let mut ahead = 0;
        while matches!(self.look_ahead(ahead), TokenKind::Newline) {
            ahead += 1;
        }
        let else_branch = if matches!(self.look_ahead(ahead), TokenKind::Else) {
            for _ in 0..=ahead {
                self.advance();
            }
            self.skip_newlines();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            span,
        ))
    }

    /// Parse `{ stmts... }` as a block expression.
    fn parse_block(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        self.skip_newlines();

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_diags() {
                break;
            }
            match self.parse_stmt(false) {
                Some(stmt) => {
                    stmts.push(stmt);
                    if !self.check(&TokenKind::RBrace) {
                        self.expect_statement_end();
                    }
                }
                None => self.synchronize(),
            }
            self.skip_newlines();
        }

        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Block(stmts), span))
    }
}
