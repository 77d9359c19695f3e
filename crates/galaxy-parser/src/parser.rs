//! Core parser infrastructure: token cursor and error reporting.

use galaxy_lexer::token::{Token, TokenKind};
use galaxy_types::{ErrorCode, GalaxyError, SourceFile, Span, StoreFull, TermStore};

/// The Galaxy parser.
///
/// Consumes a token stream produced by the lexer and allocates the parsed
/// terms into a [`TermStore`]. Parsing is fail-fast: the first malformed
/// equation aborts the whole file.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Arena receiving the parsed terms.
    pub(crate) store: &'src mut TermStore,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream, its source file and the
    /// store the terms are allocated in.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile, store: &'src mut TermStore) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            store,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Returns the kind of the current token, treating the end of the
    /// stream as `Eof`.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.peek().map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    /// Returns `true` if the current token ends the line (or the file).
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Eof)
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Skip all consecutive newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline) {
            self.pos += 1;
        }
    }

    /// Number of tokens between the cursor and the end of the current line.
    pub(crate) fn tokens_left_on_line(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .take_while(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
            .count()
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an error pointing at `span`.
    pub(crate) fn error_at(
        &self,
        span: Span,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> GalaxyError {
        let source_line = self.source_file.line(span.line).unwrap_or("");
        GalaxyError::new(&self.source_file.name, code, message, span, source_line)
    }

    /// Build an error pointing at the current token.
    pub(crate) fn error_at_current(&self, code: ErrorCode, message: impl Into<String>) -> GalaxyError {
        self.error_at(self.current_span(), code, message)
    }

    /// The store refused a new node while parsing at the cursor.
    pub(crate) fn store_full(&self, err: StoreFull) -> GalaxyError {
        self.error_at_current(ErrorCode::TERM_LIMIT, err.to_string())
    }

    pub(crate) fn file_name(&self) -> &str {
        &self.source_file.name
    }
}
