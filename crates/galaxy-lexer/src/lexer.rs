//! Core Galaxy lexer: converts an equation file into tokens.
//!
//! Tokens are separated by spaces or tabs; each source line ends with a
//! [`TokenKind::Newline`] and the stream ends with [`TokenKind::Eof`].
//! Lexing is fail-fast: the first malformed lexeme aborts with a
//! [`GalaxyError`].

use galaxy_types::{ErrorCode, GalaxyError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The Galaxy lexer.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> galaxy_types::Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
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

    fn span_from(&self, start_col: u32) -> Span {
        Span::new(self.line, start_col, self.col.saturating_sub(1).max(start_col))
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> GalaxyError {
        let source_line = self.source_file.line(span.line).unwrap_or("");
        GalaxyError::new(&self.source_file.name, code, message, span, source_line)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r') = self.peek() {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan(&mut self) -> galaxy_types::Result<Token> {
        self.skip_whitespace();

        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::point(self.line, self.col)));
        };

        let kind = match ch {
            b'\n' => {
                return Ok(Token::new(
                    TokenKind::Newline,
                    Span::point(start_line, start_col),
                ))
            }
            b'=' => TokenKind::Equals,
            b'(' => TokenKind::LParen,
            b',' => TokenKind::Comma,
            b')' => TokenKind::RParen,
            b'-' | b'0'..=b'9' => self.scan_number(start_col)?,
            b':' => self.scan_back_ref(start_col)?,
            c if is_name_start(c) => self.scan_name(),
            other => {
                return Err(self
                    .error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{}'", other as char),
                        Span::point(start_line, start_col),
                    )
                    .with_suggestion("equations use `name = ap ...` with space-separated tokens"));
            }
        };

        let span = self.span_from(start_col);
        if matches!(
            kind,
            TokenKind::Number(_) | TokenKind::Name(_) | TokenKind::BackRef(_) | TokenKind::Ap
        ) {
            self.expect_separator()?;
        }
        Ok(Token::new(kind, span))
    }

    /// Words must be followed by whitespace, a line end, `,` or `)`.
    fn expect_separator(&self) -> galaxy_types::Result<()> {
        match self.peek() {
            None | Some(b' ' | b'\t' | b'\r' | b'\n' | b',' | b')') => Ok(()),
            Some(c) => Err(self.error(
                ErrorCode::UNEXPECTED_CHARACTER,
                format!("unexpected character '{}' inside a token", c as char),
                Span::point(self.line, self.col),
            )),
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn text_from(&self, start_pos: usize) -> &'src str {
        // Every consumed byte is ASCII, so the slice is valid UTF-8.
        std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or_default()
    }

    fn scan_number(&mut self, start_col: u32) -> galaxy_types::Result<TokenKind> {
        let start_pos = self.pos - 1;
        self.take_while(|c| c.is_ascii_digit());
        let text = self.text_from(start_pos);
        text.parse::<i64>().map(TokenKind::Number).map_err(|_| {
            self.error(
                ErrorCode::INVALID_NUMBER,
                format!("invalid integer literal '{text}'"),
                self.span_from(start_col),
            )
        })
    }

    fn scan_back_ref(&mut self, start_col: u32) -> galaxy_types::Result<TokenKind> {
        let start_pos = self.pos - 1;
        self.take_while(|c| c.is_ascii_digit());
        let text = self.text_from(start_pos);
        if text.len() == 1 {
            return Err(self.error(
                ErrorCode::INVALID_NAME,
                "expected digits after ':'",
                self.span_from(start_col),
            ));
        }
        Ok(TokenKind::BackRef(text.to_string()))
    }

    fn scan_name(&mut self) -> TokenKind {
        let start_pos = self.pos - 1;
        self.take_while(is_name_continue);
        match self.text_from(start_pos) {
            "ap" => TokenKind::Ap,
            name => TokenKind::Name(name.to_string()),
        }
    }
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_name_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
