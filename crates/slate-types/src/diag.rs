use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics recorded per fragment before fail-fast.
pub const MAX_DIAGS: usize = 20;

/// Diagnostic category, determined by code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagCategory {
    Syntax,
    Structure,
}

impl fmt::Display for DiagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Structure => write!(f, "structure"),
        }
    }
}

/// Numeric diagnostic code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiagCode(pub u16);

impl DiagCode {
    // ── Syntax (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNEXPECTED_CHARACTER: Self = Self(101);
    pub const UNTERMINATED_STRING: Self = Self(102);
    pub const UNTERMINATED_COMMENT: Self = Self(103);
    pub const BAD_CHAR_LITERAL: Self = Self(104);
    pub const INVALID_NUMBER: Self = Self(105);
    pub const INVALID_ESCAPE: Self = Self(106);
    pub const EXPECTED_TYPE: Self = Self(107);
    pub const EXPECTED_EXPRESSION: Self = Self(108);

    // ── Structure (E200–E299) ──
    pub const MISSING_INITIALIZER: Self = Self(200);
    pub const MISSING_BODY: Self = Self(201);

    /// Get the category for this diagnostic code.
    pub fn category(self) -> DiagCategory {
        match self.0 {
            100..=199 => DiagCategory::Syntax,
            _ => DiagCategory::Structure,
        }
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured diagnostic from the lexer or parser.
///
/// The `message` field is what a worksheet shows on a failed line, so it
/// is written for end users, not compiler developers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source file name.
    pub file: String,
    /// Diagnostic code (e.g., E100).
    pub code: DiagCode,
    /// Category (derived from code).
    pub category: DiagCategory,
    /// Human-readable message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        file: impl Into<String>,
        code: DiagCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Diagnostics collected during one lex or parse pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub diags: Vec<Diagnostic>,
    pub total: usize,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self {
            diags: Vec::new(),
            total: 0,
        }
    }

    /// Check whether any diagnostic was recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Add a diagnostic, respecting the MAX_DIAGS limit.
    pub fn push(&mut self, diag: Diagnostic) {
        if self.diags.len() < MAX_DIAGS {
            self.diags.push(diag);
        }
        self.total += 1;
    }

    /// The first recorded diagnostic, if any.
    ///
    /// Fragment recovery reports only the first problem of a failed pass.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.diags.first()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diag_code_category() {
        assert_eq!(DiagCode::UNEXPECTED_TOKEN.category(), DiagCategory::Syntax);
        assert_eq!(
            DiagCode::UNTERMINATED_STRING.category(),
            DiagCategory::Syntax
        );
        assert_eq!(
            DiagCode::MISSING_INITIALIZER.category(),
            DiagCategory::Structure
        );
        assert_eq!(DiagCode::MISSING_BODY.category(), DiagCategory::Structure);
    }

    #[test]
    fn test_diag_code_display() {
        assert_eq!(format!("{}", DiagCode::UNEXPECTED_TOKEN), "E100");
        assert_eq!(format!("{}", DiagCode::MISSING_INITIALIZER), "E200");
    }

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::new(
            "sheet.slate",
            DiagCode::UNEXPECTED_TOKEN,
            "expected an identifier after 'val', got '='",
            Span::new(1, 5, 1, 6),
            "val = 5",
        );
        assert_eq!(diag.code, DiagCode::UNEXPECTED_TOKEN);
        assert_eq!(diag.category, DiagCategory::Syntax);
        assert_eq!(
            format!("{diag}"),
            "1:5: E100 [syntax] expected an identifier after 'val', got '='"
        );
    }

    #[test]
    fn test_diagnostic_json_serialization() {
        let diag = Diagnostic::new(
            "sheet.slate",
            DiagCode::UNTERMINATED_STRING,
            "unterminated string literal",
            Span::new(3, 9, 3, 14),
            "val s = \"oops",
        );
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"message\""));
        // Span fields are flattened into the diagnostic object.
        assert!(json.contains("\"start_line\":3"));
        assert!(json.contains("\"start_col\":9"));

        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, diag.code);
        assert_eq!(back.message, diag.message);
        assert_eq!(back.span, diag.span);
    }

    #[test]
    fn test_diagnostics_max_limit() {
        let mut diags = Diagnostics::empty();
        for i in 0..25 {
            diags.push(Diagnostic::new(
                "sheet.slate",
                DiagCode::UNEXPECTED_TOKEN,
                format!("problem {i}"),
                Span::point(i as u32 + 1, 1),
                "",
            ));
        }
        // Only 20 stored, but total count is 25
        assert_eq!(diags.diags.len(), 20);
        assert_eq!(diags.total, 25);
        assert!(!diags.is_empty());
    }

    #[test]
    fn test_diagnostics_first() {
        let mut diags = Diagnostics::empty();
        assert!(diags.first().is_none());
        diags.push(Diagnostic::new(
            "sheet.slate",
            DiagCode::EXPECTED_EXPRESSION,
            "expected an expression after '='",
            Span::point(1, 9),
            "val x =",
        ));
        diags.push(Diagnostic::new(
            "sheet.slate",
            DiagCode::UNEXPECTED_TOKEN,
            "later problem",
            Span::point(2, 1),
            "",
        ));
        assert_eq!(
            diags.first().map(|d| d.message.as_str()),
            Some("expected an expression after '='")
        );
    }

    #[test]
    fn test_diagnostics_empty() {
        let diags = Diagnostics::empty();
        assert!(diags.is_empty());
        assert_eq!(diags.total, 0);
    }
}
