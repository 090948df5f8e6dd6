//! Fragment call syntax: `+name`, `@name`, `+#{expression}`

use crate::component::ast::CallName;
use crate::component::error::{LexError, LexErrorKind};
use crate::component::lexer::interpolation::{scan_interpolation, Unbalanced};
use crate::component::lexer::scanners::{ClassScanner, SubScanner, NAME};
use crate::component::lexer::{Scanner, State, Token, TokenKind};

/// Scans a call marker followed by a plain or interpolated fragment name, then hands the
/// rest of the statement to the class and trailing scanners
pub struct ComponentScanner {
    prefixes: Vec<char>,
}

impl ComponentScanner {
    pub fn new(prefixes: Vec<char>) -> Self {
        ComponentScanner { prefixes }
    }

    fn scan_name(&self, state: &mut State<'_>) -> Result<Option<CallName>, LexError> {
        if let Some(captures) = state.eat_regex(&NAME) {
            return Ok(Some(CallName::Plain(captures[0].to_string())));
        }

        match scan_interpolation(state.rest()) {
            None => Ok(None),
            Some(Ok((expr, len))) => {
                let name = CallName::Interpolated(expr.trim().to_string());
                state.advance(len);
                Ok(Some(name))
            }
            Some(Err(Unbalanced::Unclosed)) => {
                Err(state.error(LexErrorKind::UnterminatedInterpolation))
            }
            Some(Err(Unbalanced::UnterminatedString)) => {
                Err(state.error(LexErrorKind::UnterminatedString))
            }
        }
    }
}

impl Scanner for ComponentScanner {
    fn name(&self) -> &'static str {
        "component-call"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        match state.peek() {
            Some(c) if self.prefixes.contains(&c) => state.advance(c.len_utf8()),
            _ => return Ok(None),
        }
        state.skip_spaces();

        let Some(name) = self.scan_name(state)? else {
            return Ok(None);
        };

        let mut tokens = vec![state.token_at(start, TokenKind::Call(name))];
        tokens.extend(ClassScanner.scan_tokens(state));
        tokens.extend(SubScanner.scan_tokens(state)?);
        Ok(Some(tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ast::Position;

    fn scan(line: &str) -> Result<Option<Vec<TokenKind>>, LexError> {
        let scanner = ComponentScanner::new(vec!['+', '@']);
        let mut state = State::new(line, 0, 0);
        scanner
            .scan(&mut state)
            .map(|tokens| tokens.map(|tokens| tokens.into_iter().map(|t| t.kind).collect()))
    }

    #[test]
    fn test_both_prefixes_scan_the_same() {
        let plus = scan("+card.wide(1, 2)").unwrap().unwrap();
        let at = scan("@card.wide(1, 2)").unwrap().unwrap();

        assert_eq!(plus, at);
        assert_eq!(
            plus,
            vec![
                TokenKind::Call(CallName::Plain("card".to_string())),
                TokenKind::Class("wide".to_string()),
                TokenKind::Arguments(vec!["1".to_string(), "2".to_string()]),
            ]
        );
    }

    #[test]
    fn test_space_after_prefix() {
        assert_eq!(
            scan("+ \tcard").unwrap().unwrap(),
            vec![TokenKind::Call(CallName::Plain("card".to_string()))]
        );
    }

    #[test]
    fn test_interpolated_name() {
        assert_eq!(
            scan(r#"+#{firstMixin("a}", 'b\'{')}(5)"#).unwrap().unwrap(),
            vec![
                TokenKind::Call(CallName::Interpolated(
                    r#"firstMixin("a}", 'b\'{')"#.to_string()
                )),
                TokenKind::Arguments(vec!["5".to_string()]),
            ]
        );
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        assert_eq!(scan("card").unwrap(), None);
        assert_eq!(scan("+").unwrap(), None);
        assert_eq!(scan("+(1)").unwrap(), None);
    }

    #[test]
    fn test_unbalanced_interpolation_is_a_lex_error() {
        let err = scan("+#{broken(").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedInterpolation);
        assert_eq!(err.position, Position::new(0, 1));

        let err = scan("+#{'open}").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }
}
