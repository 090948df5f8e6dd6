//! Template lexer
//!
//! Scans a template line by line. Indentation is handled by
//! [`indentation::IndentationTracker`]; the content of each line is handed to the
//! scanner chain, extension scanners first. Block expansion (`tag: nested`) lets a line
//! hold several statements, each scanned by the full chain.
//!
//! - `tokens` - token kinds
//! - `state` - the line cursor scanners work on
//! - `interpolation` - balanced `#{...}` and `(...)` scanning
//! - `scanners` - the host scanners and the [`Scanner`] trait
//! - `indentation` - indentation levels

pub mod indentation;
pub mod interpolation;
pub mod scanners;
pub mod state;
pub mod tokens;

pub use scanners::{host_scanners, Scanner};
pub use state::State;
pub use tokens::{Token, TokenKind};

use crate::component::ast::Position;
use crate::component::error::{LexError, LexErrorKind};
use indentation::{measure, IndentationTracker};

pub struct Lexer {
    scanners: Vec<Box<dyn Scanner>>,
}

impl Lexer {
    /// A lexer trying `scanners` in order
    pub fn new(scanners: Vec<Box<dyn Scanner>>) -> Self {
        Lexer { scanners }
    }

    pub fn scanner_names(&self) -> Vec<&'static str> {
        self.scanners.iter().map(|scanner| scanner.name()).collect()
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut tracker = IndentationTracker::new();
        let mut last_line = 0;

        for (line_number, line) in source.lines().enumerate() {
            last_line = line_number;
            if line.trim().is_empty() {
                continue;
            }

            let width = measure(line, line_number)?;
            tokens.extend(tracker.line(width, line_number)?);

            let mut state = State::new(&line[width..], line_number, width);
            tokens.extend(self.scan_line(&mut state)?);
            tokens.push(Token::new(
                TokenKind::Newline,
                Position::new(line_number, line.len()),
            ));
        }

        tokens.extend(tracker.finish(last_line + 1));
        Ok(tokens)
    }

    fn scan_line(&self, state: &mut State<'_>) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let statement = self.scan_statement(state)?;
            let expands = matches!(
                statement.last(),
                Some(Token {
                    kind: TokenKind::Expansion,
                    ..
                })
            );
            tokens.extend(statement);

            if expands && !state.is_at_end() {
                continue;
            }
            if let Some(c) = state.peek() {
                if !state.rest().trim().is_empty() {
                    return Err(state.error(LexErrorKind::UnexpectedCharacter(c)));
                }
            }
            return Ok(tokens);
        }
    }

    fn scan_statement(&self, state: &mut State<'_>) -> Result<Vec<Token>, LexError> {
        for scanner in &self.scanners {
            let checkpoint = state.checkpoint();
            match scanner.scan(state)? {
                Some(tokens) => return Ok(tokens),
                None => state.restore(checkpoint),
            }
        }
        let c = state.peek().unwrap_or(' ');
        Err(state.error(LexErrorKind::UnexpectedCharacter(c)))
    }
}
