//! Token types for the Galaxy lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of an equation file and
//! [`Token`], which pairs a kind with a source [`Span`].

use galaxy_types::Span;
use std::fmt;

/// A single token produced by the lexer.
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
}

/// Every token kind in an equation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Signed decimal literal: `42`, `-7`
    Number(i64),
    /// Primitive or equation name: `cons`, `galaxy`, `statelessdraw`
    Name(String),
    /// Numbered back-reference to another equation: `:1029`
    BackRef(String),
    /// The application marker `ap`
    Ap,
    /// The equation separator `=`
    Equals,
    /// `(` opening a list literal
    LParen,
    /// `,` between list literal elements
    Comma,
    /// `)` closing a list literal
    RParen,
    /// End of an equation line
    Newline,
    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Name(name) | TokenKind::BackRef(name) => f.write_str(name),
            TokenKind::Ap => f.write_str("ap"),
            TokenKind::Equals => f.write_str("="),
            TokenKind::LParen => f.write_str("("),
            TokenKind::Comma => f.write_str(","),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Newline => f.write_str("newline"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
