//! Term parsing.
//!
//! A term is a run of `ap` markers, an atom, and then exactly as many
//! operand terms as there were markers, folded onto the atom left to right:
//! `ap ap add 1 2` is `Application(Application(add, 1), 2)`.
//! Operand nesting is handled with an explicit stack so long `cons` chains
//! do not grow the call stack.

use galaxy_lexer::token::TokenKind;
use galaxy_types::{ErrorCode, GalaxyError, Primitive, TermId};

use crate::parser::Parser;

/// A partially built application waiting for `remaining` more operands.
struct Pending {
    head: TermId,
    remaining: usize,
}

impl<'src> Parser<'src> {
    /// Parse one complete term starting at the cursor.
    pub(crate) fn parse_term(&mut self) -> Result<TermId, GalaxyError> {
        let mut stack: Vec<Pending> = Vec::new();
        loop {
            let mut markers = 0;
            while matches!(self.peek_kind(), TokenKind::Ap) {
                self.advance();
                markers += 1;
            }
            let atom = self.parse_atom()?;
            if markers > 0 {
                stack.push(Pending {
                    head: atom,
                    remaining: markers,
                });
                continue;
            }

            // Fold the finished operand into every application it completes.
            let mut value = atom;
            loop {
                let Some(top) = stack.last_mut() else {
                    return Ok(value);
                };
                top.head = self.store.app(top.head, value).map_err(|e| self.store_full(e))?;
                top.remaining -= 1;
                if top.remaining > 0 {
                    break;
                }
                value = top.head;
                stack.pop();
            }
        }
    }

    /// Parse a number, a name, a back-reference or a list literal.
    fn parse_atom(&mut self) -> Result<TermId, GalaxyError> {
        let span = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                self.store.number(n).map_err(|e| self.store_full(e))
            }
            TokenKind::Name(name) => {
                self.advance();
                self.resolve_name(&name)
            }
            TokenKind::BackRef(name) => {
                self.advance();
                self.store.reference(&name).map_err(|e| self.store_full(e))
            }
            TokenKind::LParen => {
                self.advance();
                self.parse_list()
            }
            TokenKind::Newline | TokenKind::Eof => Err(self.error_at(
                span,
                ErrorCode::MISSING_OPERAND,
                "equation ends before every 'ap' has its operands",
            )),
            TokenKind::Equals => Err(self.error_at(
                span,
                ErrorCode::MISPLACED_SEPARATOR,
                "'=' may only follow the equation name",
            )),
            other => Err(self.error_at(
                span,
                ErrorCode::MISSING_OPERAND,
                format!("expected a term, got '{other}'"),
            )),
        }
    }

    /// Primitives and `nil` resolve to their shared leaves; every other name
    /// becomes a reference looked up at evaluation time.
    fn resolve_name(&mut self, name: &str) -> Result<TermId, GalaxyError> {
        if name == "nil" {
            return Ok(self.store.nil());
        }
        match Primitive::from_name(name) {
            Some(p) => Ok(self.store.primitive(p)),
            None => self.store.reference(name).map_err(|e| self.store_full(e)),
        }
    }

    /// `( )`, `( x0 )`, `( x0 , x1 , ... )`. The opening paren is already consumed.
    fn parse_list(&mut self) -> Result<TermId, GalaxyError> {
        let mut items = Vec::new();
        if matches!(self.peek_kind(), TokenKind::RParen) {
            self.advance();
            return self.store.list(items).map_err(|e| self.store_full(e));
        }
        loop {
            items.push(self.parse_term()?);
            match self.peek_kind() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {
                    self.advance();
                    return self.store.list(items).map_err(|e| self.store_full(e));
                }
                other => {
                    let message = format!("expected ',' or ')' in list literal, got '{other}'");
                    return Err(self.error_at_current(ErrorCode::MISSING_OPERAND, message));
                }
            }
        }
    }
}
