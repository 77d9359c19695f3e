//! Equation files: `name = term`, one per line.

use galaxy_lexer::token::TokenKind;
use galaxy_lexer::Lexer;
use galaxy_types::{ErrorCode, SourceFile, Span, TermId, TermStore};

use crate::parser::Parser;

/// One parsed line: a name bound to a term.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub name: String,
    pub term: TermId,
    /// Location of the name on its line.
    pub span: Span,
}

/// Every equation of a file, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub file: String,
    pub equations: Vec<Equation>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Find the last equation binding `name`.
    pub fn get(&self, name: &str) -> Option<&Equation> {
        self.equations.iter().rev().find(|e| e.name == name)
    }
}

/// Lex and parse a whole source file into `store`.
pub fn parse_source(source_file: &SourceFile, store: &mut TermStore) -> galaxy_types::Result<Program> {
    let tokens = Lexer::new(source_file).lex()?;
    Parser::new(tokens, source_file, store).parse()
}

impl<'src> Parser<'src> {
    /// Parse every equation in the token stream. Blank lines are skipped.
    pub fn parse(mut self) -> galaxy_types::Result<Program> {
        let mut program = Program {
            file: self.file_name().to_string(),
            equations: Vec::new(),
        };
        loop {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            program.equations.push(self.parse_equation()?);
        }
        log::debug!(
            "parsed {} equations from {}",
            program.equations.len(),
            program.file
        );
        Ok(program)
    }

    /// Parse `name = term` up to the end of its line.
    fn parse_equation(&mut self) -> galaxy_types::Result<Equation> {
        let line_start = self.current_span();
        if self.tokens_left_on_line() < 3 {
            return Err(self
                .error_at(
                    line_start,
                    ErrorCode::TRUNCATED_EQUATION,
                    "an equation needs a name, '=' and a term",
                )
                .with_suggestion("write `name = term`"));
        }

        let name_span = self.current_span();
        let name = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Name(name) | TokenKind::BackRef(name)) => name,
            Some(other) => {
                return Err(self.error_at(
                    name_span,
                    ErrorCode::INVALID_NAME,
                    format!("expected an equation name, got '{other}'"),
                ))
            }
            None => {
                return Err(self.error_at(
                    name_span,
                    ErrorCode::TRUNCATED_EQUATION,
                    "unexpected end of file",
                ))
            }
        };

        if !matches!(self.peek_kind(), TokenKind::Equals) {
            let found = self.peek_kind().to_string();
            return Err(self
                .error_at_current(
                    ErrorCode::MISSING_SEPARATOR,
                    format!("expected '=' after '{name}', got '{found}'"),
                )
                .with_suggestion("write `name = term`"));
        }
        self.advance();

        let term = self.parse_term()?;

        if !self.at_line_end() {
            let found = self.peek_kind().to_string();
            return Err(self.error_at_current(
                ErrorCode::TRAILING_TOKENS,
                format!("unexpected '{found}' after the end of the term for '{name}'"),
            ));
        }

        Ok(Equation {
            name,
            term,
            span: name_span,
        })
    }
}
