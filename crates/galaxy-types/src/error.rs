use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error code for syntax diagnostics (E100–E199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const TRUNCATED_EQUATION: Self = Self(101);
    pub const MISSING_SEPARATOR: Self = Self(102);
    pub const INVALID_NAME: Self = Self(103);
    pub const INVALID_NUMBER: Self = Self(104);
    pub const MISSING_OPERAND: Self = Self(105);
    pub const TRAILING_TOKENS: Self = Self(106);
    pub const MISPLACED_SEPARATOR: Self = Self(107);
    pub const TERM_LIMIT: Self = Self(108);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured syntax error raised while loading an equation file.
///
/// Serializes to the flat JSON shape hosts display: `file`, `code`,
/// `message`, `line`, `column`, `end_column`, `source_line` and an
/// optional `suggestion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E102).
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl GalaxyError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for GalaxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} {}", self.file, self.span, self.code, self.message)
    }
}

impl std::error::Error for GalaxyError {}
