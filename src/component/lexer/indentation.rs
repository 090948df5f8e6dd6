//! Indentation tracking
//!
//! Converts the leading whitespace width of each non-blank line into `Indent` and
//! `Outdent` tokens. Widths are kept on a stack, so nested blocks may use any consistent
//! step. An outdent must land exactly on an enclosing level.

use super::tokens::{Token, TokenKind};
use crate::component::ast::Position;
use crate::component::error::{LexError, LexErrorKind};

#[derive(Debug)]
pub struct IndentationTracker {
    levels: Vec<usize>,
}

impl IndentationTracker {
    pub fn new() -> Self {
        IndentationTracker { levels: vec![0] }
    }

    fn current(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    /// Returns the indentation tokens for a line starting at `width`
    pub fn line(&mut self, width: usize, line_number: usize) -> Result<Vec<Token>, LexError> {
        let position = Position::new(line_number, 0);
        let mut tokens = Vec::new();

        if width > self.current() {
            self.levels.push(width);
            tokens.push(Token::new(TokenKind::Indent, position));
            return Ok(tokens);
        }

        while width < self.current() {
            self.levels.pop();
            tokens.push(Token::new(TokenKind::Outdent, position));
        }

        if width != self.current() {
            return Err(LexError::new(
                Position::new(line_number, width),
                LexErrorKind::InconsistentIndentation,
            ));
        }
        Ok(tokens)
    }

    /// Closes every open level
    pub fn finish(&mut self, line_number: usize) -> Vec<Token> {
        let position = Position::new(line_number, 0);
        let open = self.levels.len().saturating_sub(1);
        self.levels.truncate(1);
        (0..open)
            .map(|_| Token::new(TokenKind::Outdent, position))
            .collect()
    }
}

impl Default for IndentationTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Measures leading whitespace, rejecting lines that mix tabs and spaces
pub fn measure(line: &str, line_number: usize) -> Result<usize, LexError> {
    let indent: &str = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
    if indent.contains(' ') && indent.contains('\t') {
        return Err(LexError::new(
            Position::new(line_number, 0),
            LexErrorKind::InconsistentIndentation,
        ));
    }
    Ok(indent.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: Vec<Token>) -> Vec<TokenKind> {
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_indent_and_outdent_several_levels() {
        let mut tracker = IndentationTracker::new();
        assert!(tracker.line(0, 0).unwrap().is_empty());
        assert_eq!(kinds(tracker.line(2, 1).unwrap()), vec![TokenKind::Indent]);
        assert_eq!(kinds(tracker.line(4, 2).unwrap()), vec![TokenKind::Indent]);
        assert_eq!(
            kinds(tracker.line(0, 3).unwrap()),
            vec![TokenKind::Outdent, TokenKind::Outdent]
        );
    }

    #[test]
    fn test_outdent_between_levels_is_rejected() {
        let mut tracker = IndentationTracker::new();
        tracker.line(0, 0).unwrap();
        tracker.line(4, 1).unwrap();
        let err = tracker.line(2, 2).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InconsistentIndentation);
    }

    #[test]
    fn test_finish_closes_open_levels() {
        let mut tracker = IndentationTracker::new();
        tracker.line(2, 0).unwrap();
        tracker.line(4, 1).unwrap();
        assert_eq!(tracker.finish(2).len(), 2);
    }

    #[test]
    fn test_measure_rejects_mixed_indentation() {
        assert_eq!(measure("    p", 0).unwrap(), 4);
        assert_eq!(measure("\t\tp", 0).unwrap(), 2);
        assert!(measure(" \tp", 0).is_err());
    }
}
