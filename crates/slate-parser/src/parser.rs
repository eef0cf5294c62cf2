//! Core parser infrastructure: token cursor, diagnostics, helpers.

use slate_lexer::token::{Token, TokenKind};
use slate_types::ast::{Fragment, Ident};
use slate_types::{DiagCode, Diagnostic, Diagnostics, SourceFile, Span, MAX_DIAGS};

/// The Slate parser.
///
/// Consumes a token stream produced by the lexer and builds a
/// [`Fragment`] AST. Collects diagnostics and attempts recovery so one
/// bad statement does not hide the rest of the fragment's problems.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for diagnostic context.
    source_file: &'src SourceFile,
    /// File name for diagnostics.
    file_name: String,
    /// Collected diagnostics.
    diags: Diagnostics,
    /// Current expression nesting depth (max 16).
    pub(crate) expr_depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    pub fragment: Option<Fragment>,
    pub diags: Diagnostics,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            file_name: source_file.name.clone(),
            source_file,
            diags: Diagnostics::empty(),
            expr_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should end with Eof")
        })
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from the current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        let idx = self.pos + n;
        self.tokens
            .get(idx)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Separator Handling ────────────────────────────────────────────────────

    /// Skip all consecutive newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Skip newlines and semicolons between statements.
    pub(crate) fn skip_separators(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semi) {
            self.advance();
        }
    }

    /// Expect the end of a statement: a newline, a `;`, a closing `}`,
    /// or end of file. Reports a diagnostic and synchronizes otherwise.
    pub(crate) fn expect_statement_end(&mut self) {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Semi => {
                self.skip_separators();
            }
            TokenKind::RBrace | TokenKind::Eof => {}
            other => {
                self.error_at_current(
                    DiagCode::UNEXPECTED_TOKEN,
                    format!("expected a new line or ';' after the statement, got '{other}'"),
                );
                self.synchronize();
            }
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or
    /// emits a diagnostic.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                DiagCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect an identifier token. Returns the name and span.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            other => {
                self.error_at_current(
                    DiagCode::UNEXPECTED_TOKEN,
                    format!("expected {what}, got '{other}'"),
                );
                None
            }
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────────

    /// Report a diagnostic at the current token position.
    pub(crate) fn error_at_current(&mut self, code: DiagCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report a diagnostic at a specific span.
    pub(crate) fn error_at(&mut self, code: DiagCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        let diag = Diagnostic::new(&self.file_name, code, message, span, source_line);
        self.diags.push(diag);
    }

    /// Returns `true` if we've hit the diagnostic limit and should stop.
    pub(crate) fn too_many_diags(&self) -> bool {
        self.diags.total >= MAX_DIAGS
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens until we reach a synchronization point.
    /// Used after an error to resume at a known-good position.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            // Stop past a separator; each statement starts fresh after one
            if matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semi) {
                self.skip_separators();
                return;
            }
            // Stop at statement-level keywords and at closing braces
            match self.peek_kind() {
                TokenKind::Val
                | TokenKind::Def
                | TokenKind::Class
                | TokenKind::Trait
                | TokenKind::Object
                | TokenKind::Case
                | TokenKind::Abstract
                | TokenKind::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Fragment` AST.
    pub fn parse(mut self) -> ParseResult {
        let fragment = self.parse_fragment();
        ParseResult {
            fragment,
            diags: self.diags,
        }
    }
}
