//! Core Slate lexer: converts worksheet source text to a token stream.
//!
//! Features:
//! - All worksheet tokens (keywords, operators, punctuation, literals)
//! - Numeric suffixes: `42L`, `2.5f`, `2.5d`
//! - Char literals with escapes: `'a'`, `'\n'`
//! - Single-line comments stripped (`//`), block comments with nesting (`/* /* */ */`)
//! - Error recovery: collects up to 20 diagnostics instead of stopping at the first
//! - Statements separated by newlines or semicolons, so both are tokens

use slate_types::{DiagCode, Diagnostic, Diagnostics, SourceFile, Span, MAX_DIAGS};

use crate::token::{Token, TokenKind};

/// The Slate lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting up to
/// [`slate_types::MAX_DIAGS`] diagnostics along the way.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for diagnostics.
    source_file: &'src SourceFile,
    /// File name (for diagnostics).
    file_name: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Collected diagnostics.
    diags: Diagnostics,
}

/// Result of lexing: tokens + any diagnostics collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Diagnostics encountered during lexing.
    pub diags: Diagnostics,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            file_name: &source_file.name,
            pos: 0,
            line: 1,
            col: 1,
            diags: Diagnostics::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.diags.total >= MAX_DIAGS {
                break;
            }

            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        // Ensure token stream always ends with Eof
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        }

        LexResult {
            tokens,
            diags: self.diags,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn text_from(&self, start_pos: usize) -> &str {
        std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("")
    }

    fn emit(&mut self, code: DiagCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let diag = Diagnostic::new(self.file_name, code, message, span, source_line);
        self.diags.push(diag);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip spaces and tabs (NOT newlines, those are tokens).
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b' ' || ch == b'\t' || ch == b'\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a single-line comment (`// ...`).
    /// Returns `true` if a comment was consumed.
    fn skip_line_comment(&mut self) -> bool {
        if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'/') {
            // Consume everything until end-of-line (but not the newline itself)
            while let Some(ch) = self.peek() {
                if ch == b'\n' {
                    break;
                }
                self.advance();
            }
            true
        } else {
            false
        }
    }

    /// Skip a block comment (`/* ... */`), honouring nesting.
    /// Returns `true` if a block comment was consumed.
    fn skip_block_comment(&mut self) -> bool {
        if self.peek() != Some(b'/') || self.peek_at(1) != Some(b'*') {
            return false;
        }
        let start_line = self.line;
        let start_col = self.col;
        self.advance();
        self.advance();
        let mut depth = 1u32;
        while depth > 0 {
            match self.peek() {
                None => {
                    let span = self.span_from(start_line, start_col);
                    self.emit(
                        DiagCode::UNTERMINATED_COMMENT,
                        "unterminated block comment",
                        span,
                    );
                    break;
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                _ => {
                    self.advance();
                }
            }
        }
        true
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if !self.skip_line_comment() && !self.skip_block_comment() {
                break;
            }
        }

        if self.diags.total >= MAX_DIAGS {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        if self.at_end() {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, self.current_span());
        };

        match ch {
            // ── Newline ──
            b'\n' => Token::new(TokenKind::Newline, self.span_from(start_line, start_col)),

            // ── Literals ──
            b'"' => self.scan_string(start_line, start_col),
            b'\'' => self.scan_char(start_line, start_col),
            b'0'..=b'9' => self.scan_number(start_pos, start_line, start_col),

            // ── Identifiers & keywords ──
            b'a'..=b'z' | b'A'..=b'Z' => self.scan_identifier(start_pos, start_line, start_col),

            // ── Underscore (existential wildcard) ──
            b'_' => {
                // If followed by a letter/digit, it's part of an identifier
                if matches!(
                    self.peek(),
                    Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
                ) {
                    self.scan_identifier(start_pos, start_line, start_col)
                } else {
                    Token::new(TokenKind::Underscore, self.span_from(start_line, start_col))
                }
            }

            // ── Operators & punctuation ──
            b'+' => Token::new(TokenKind::Plus, self.span_from(start_line, start_col)),
            b'-' => Token::new(TokenKind::Minus, self.span_from(start_line, start_col)),
            b'*' => Token::new(TokenKind::Star, self.span_from(start_line, start_col)),
            b'%' => Token::new(TokenKind::Percent, self.span_from(start_line, start_col)),

            b'/' => {
                // // and /* were handled above, so a bare / is division
                Token::new(TokenKind::Slash, self.span_from(start_line, start_col))
            }

            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::EqEq, self.span_from(start_line, start_col))
                } else if self.peek() == Some(b'>') {
                    self.advance();
                    Token::new(TokenKind::FatArrow, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Eq, self.span_from(start_line, start_col))
                }
            }

            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::BangEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Bang, self.span_from(start_line, start_col))
                }
            }

            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::LessEq, self.span_from(start_line, start_col))
                } else if self.peek() == Some(b':') {
                    self.advance();
                    Token::new(TokenKind::Subtype, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Less, self.span_from(start_line, start_col))
                }
            }

            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::GreaterEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Greater, self.span_from(start_line, start_col))
                }
            }

            b'&' => {
                if self.peek() == Some(b'&') {
                    self.advance();
                    Token::new(TokenKind::AmpAmp, self.span_from(start_line, start_col))
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit(
                        DiagCode::UNEXPECTED_CHARACTER,
                        "unexpected character '&', use '&&'",
                        span,
                    );
                    self.scan_token()
                }
            }

            b'|' => {
                if self.peek() == Some(b'|') {
                    self.advance();
                    Token::new(TokenKind::PipePipe, self.span_from(start_line, start_col))
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit(
                        DiagCode::UNEXPECTED_CHARACTER,
                        "unexpected character '|', use '||'",
                        span,
                    );
                    self.scan_token()
                }
            }

            b'?' => {
                if self.peek() == Some(b'?') && self.peek_at(1) == Some(b'?') {
                    self.advance();
                    self.advance();
                    Token::new(
                        TokenKind::Unimplemented,
                        self.span_from(start_line, start_col),
                    )
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit(
                        DiagCode::UNEXPECTED_CHARACTER,
                        "unexpected character '?', the placeholder is '???'",
                        span,
                    );
                    self.scan_token()
                }
            }

            b'(' => Token::new(TokenKind::LParen, self.span_from(start_line, start_col)),
            b')' => Token::new(TokenKind::RParen, self.span_from(start_line, start_col)),
            b'{' => Token::new(TokenKind::LBrace, self.span_from(start_line, start_col)),
            b'}' => Token::new(TokenKind::RBrace, self.span_from(start_line, start_col)),
            b'[' => Token::new(TokenKind::LBracket, self.span_from(start_line, start_col)),
            b']' => Token::new(TokenKind::RBracket, self.span_from(start_line, start_col)),
            b',' => Token::new(TokenKind::Comma, self.span_from(start_line, start_col)),
            b':' => Token::new(TokenKind::Colon, self.span_from(start_line, start_col)),
            b';' => Token::new(TokenKind::Semi, self.span_from(start_line, start_col)),
            b'.' => Token::new(TokenKind::Dot, self.span_from(start_line, start_col)),

            _ => {
                let span = self.span_from(start_line, start_col);
                self.emit(
                    DiagCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{}'", ch as char),
                    span,
                );
                // Error recovery: skip the character and try again
                self.scan_token()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        // We already consumed the first digit
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        // Decimal point only counts when followed by a digit, so `3.min`
        // style selections still lex as Int + Dot + Identifier.
        let mut is_decimal = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_decimal = true;
            self.advance(); // consume '.'
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }

        let digits_end = self.pos;

        // Optional type suffix.
        let suffix = match self.peek() {
            Some(b'L' | b'l') => {
                self.advance();
                Some(b'L')
            }
            Some(b'f' | b'F') => {
                self.advance();
                Some(b'f')
            }
            Some(b'd' | b'D') => {
                self.advance();
                Some(b'd')
            }
            _ => None,
        };

        let span = self.span_from(start_line, start_col);
        let text = std::str::from_utf8(&self.source[start_pos..digits_end])
            .unwrap_or("0")
            .to_string();

        match suffix {
            Some(b'L') => {
                if is_decimal {
                    self.emit(
                        DiagCode::INVALID_NUMBER,
                        format!("decimal literal '{text}' cannot take the 'L' suffix"),
                        span,
                    );
                    return Token::new(TokenKind::LongLit(0), span);
                }
                match text.parse::<i64>() {
                    Ok(n) => Token::new(TokenKind::LongLit(n), span),
                    Err(_) => {
                        self.emit(
                            DiagCode::INVALID_NUMBER,
                            format!("integer literal '{text}' is out of range for Long"),
                            span,
                        );
                        Token::new(TokenKind::LongLit(0), span)
                    }
                }
            }
            Some(b'f') => {
                let value: f32 = text.parse().unwrap_or(0.0);
                Token::new(TokenKind::FloatLit(value), span)
            }
            Some(b'd') => {
                let value: f64 = text.parse().unwrap_or(0.0);
                Token::new(TokenKind::DoubleLit(value), span)
            }
            _ if is_decimal => {
                let value: f64 = text.parse().unwrap_or(0.0);
                Token::new(TokenKind::DoubleLit(value), span)
            }
            _ => match text.parse::<i32>() {
                Ok(n) => Token::new(TokenKind::IntLit(n), span),
                Err(_) => {
                    self.emit(
                        DiagCode::INVALID_NUMBER,
                        format!("integer literal '{text}' is out of range for Int"),
                        span,
                    );
                    Token::new(TokenKind::IntLit(0), span)
                }
            },
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        // First character was already consumed (letter or `_`)
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = self.text_from(start_pos);

        let kind =
            TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Token::new(kind, span)
    }

    // ─────────────────────────────────────────────────────────────
    // String & char literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening `"`.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut buf: Vec<u8> = Vec::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit(DiagCode::UNTERMINATED_STRING, "unterminated string literal", span);
                    let text = String::from_utf8(buf).unwrap_or_default();
                    return Token::new(TokenKind::StrLit(text), span);
                }
                Some(b'"') => {
                    self.advance();
                    let text = String::from_utf8(buf).unwrap_or_default();
                    return Token::new(TokenKind::StrLit(text), self.span_from(start_line, start_col));
                }
                Some(b'\\') => {
                    self.advance();
                    match self.scan_escape() {
                        Some(c) => buf.push(c),
                        None => {
                            // Diagnostic already emitted; keep scanning the string
                        }
                    }
                }
                Some(byte) => {
                    self.advance();
                    buf.push(byte);
                }
            }
        }
    }

    /// Scan a char literal starting after the opening `'`.
    fn scan_char(&mut self, start_line: u32, start_col: u32) -> Token {
        let value = match self.peek() {
            None | Some(b'\n') => {
                let span = self.span_from(start_line, start_col);
                self.emit(DiagCode::BAD_CHAR_LITERAL, "unterminated character literal", span);
                return Token::new(TokenKind::CharLit('\0'), span);
            }
            Some(b'\'') => {
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.emit(DiagCode::BAD_CHAR_LITERAL, "empty character literal", span);
                return Token::new(TokenKind::CharLit('\0'), span);
            }
            Some(b'\\') => {
                self.advance();
                self.scan_escape().map(|b| b as char).unwrap_or('\0')
            }
            Some(byte) if byte.is_ascii() => {
                self.advance();
                byte as char
            }
            Some(_) => {
                // Multi-byte UTF-8 scalar: decode it from the source text
                let rest = &self.source_file.source[self.pos..];
                let c = rest.chars().next().unwrap_or('\0');
                for _ in 0..c.len_utf8() {
                    self.advance();
                }
                c
            }
        };

        if self.peek() == Some(b'\'') {
            self.advance();
            Token::new(TokenKind::CharLit(value), self.span_from(start_line, start_col))
        } else {
            // Consume until the closing quote or end-of-line for recovery
            while let Some(ch) = self.peek() {
                if ch == b'\'' || ch == b'\n' {
                    break;
                }
                self.advance();
            }
            if self.peek() == Some(b'\'') {
                self.advance();
            }
            let span = self.span_from(start_line, start_col);
            self.emit(
                DiagCode::BAD_CHAR_LITERAL,
                "character literal may contain only one character",
                span,
            );
            Token::new(TokenKind::CharLit(value), span)
        }
    }

    /// Scan the character after a backslash. Returns the decoded byte,
    /// or `None` after emitting a diagnostic for an unknown escape.
    fn scan_escape(&mut self) -> Option<u8> {
        let span = self.current_span();
        match self.advance() {
            Some(b'n') => Some(b'\n'),
            Some(b't') => Some(b'\t'),
            Some(b'r') => Some(b'\r'),
            Some(b'0') => Some(b'\0'),
            Some(b'\\') => Some(b'\\'),
            Some(b'\'') => Some(b'\''),
            Some(b'"') => Some(b'"'),
            Some(other) => {
                self.emit(
                    DiagCode::INVALID_ESCAPE,
                    format!("unknown escape sequence '\\{}'", other as char),
                    span,
                );
                None
            }
            None => {
                self.emit(DiagCode::INVALID_ESCAPE, "incomplete escape sequence", span);
                None
            }
        }
    }
}
