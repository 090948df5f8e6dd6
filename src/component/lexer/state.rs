//! Line cursor shared by all scanners

use regex::{Captures, Regex};

use super::tokens::{Token, TokenKind};
use crate::component::ast::Position;
use crate::component::error::{LexError, LexErrorKind};

/// Cursor over the content of one template line (indentation already removed)
#[derive(Debug, Clone)]
pub struct State<'a> {
    line: &'a str,
    line_number: usize,
    /// Column of `line[0]` in the source line
    column_offset: usize,
    cursor: usize,
}

impl<'a> State<'a> {
    pub fn new(line: &'a str, line_number: usize, column_offset: usize) -> Self {
        State {
            line,
            line_number,
            column_offset,
            cursor: 0,
        }
    }

    pub fn rest(&self) -> &'a str {
        &self.line[self.cursor..]
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.line.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn position(&self) -> Position {
        Position::new(self.line_number, self.column_offset + self.cursor)
    }

    /// Consumes `literal` if the rest of the line starts with it
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.cursor += literal.len();
            true
        } else {
            false
        }
    }

    /// Consumes the match of an anchored (`^`) pattern
    pub fn eat_regex(&mut self, pattern: &Regex) -> Option<Captures<'a>> {
        let rest = self.rest();
        let captures = pattern.captures(rest)?;
        let end = captures.get(0).map(|m| m.end()).unwrap_or(0);
        self.cursor += end;
        Some(captures)
    }

    pub fn advance(&mut self, bytes: usize) {
        self.cursor = (self.cursor + bytes).min(self.line.len());
    }

    /// Consumes and returns the rest of the line
    pub fn take_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.cursor = self.line.len();
        rest
    }

    pub fn skip_spaces(&mut self) {
        let trimmed = self.rest().trim_start_matches([' ', '\t']);
        self.cursor = self.line.len() - trimmed.len();
    }

    pub fn checkpoint(&self) -> usize {
        self.cursor
    }

    pub fn restore(&mut self, checkpoint: usize) {
        self.cursor = checkpoint;
    }

    /// Builds a token positioned at `checkpoint`
    pub fn token_at(&self, checkpoint: usize, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Position::new(self.line_number, self.column_offset + checkpoint),
        )
    }

    pub fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(self.position(), kind)
    }

    /// Error positioned at a byte offset relative to the cursor
    pub fn error_at_offset(&self, offset: usize, kind: LexErrorKind) -> LexError {
        LexError::new(
            Position::new(
                self.line_number,
                self.column_offset + self.cursor + offset,
            ),
            kind,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+").unwrap());

    #[test]
    fn test_eat_and_restore() {
        let mut state = State::new("div.box", 3, 2);
        let checkpoint = state.checkpoint();

        assert_eq!(state.eat_regex(&WORD).unwrap().get(0).unwrap().as_str(), "div");
        assert_eq!(state.position(), Position::new(3, 5));
        assert!(state.eat("."));
        assert_eq!(state.rest(), "box");

        state.restore(checkpoint);
        assert_eq!(state.rest(), "div.box");
    }

    #[test]
    fn test_skip_spaces_and_take_rest() {
        let mut state = State::new(" \t hello world", 0, 0);
        state.skip_spaces();
        assert_eq!(state.take_rest(), "hello world");
        assert!(state.is_at_end());
    }
}
