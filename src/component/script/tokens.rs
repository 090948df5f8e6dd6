//! Token definitions for generated scripts

use logos::Logos;
use std::fmt;
use std::ops::Range;

use crate::component::ast::SourceLocation;
use crate::component::error::ScriptError;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("echo")]
    Echo,
    #[token("call")]
    Call,
    #[token("with")]
    With,
    #[token("fragment")]
    Fragment,
    #[token("children")]
    Children,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape(lex.slice()))]
    Str(String),

    #[token("::")]
    PathSep,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("=")]
    Assign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Int(value) => write!(f, "integer {}", value),
            Token::Str(value) => write!(f, "string {:?}", value),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Strips the quotes of a string literal and resolves its escapes
fn unescape(literal: &str) -> Option<String> {
    let inner = literal.get(1..literal.len().checked_sub(1)?)?;
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'b' => result.push('\u{8}'),
            'f' => result.push('\u{c}'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                result.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            other => result.push(other),
        }
    }
    Some(result)
}

/// Quotes text as a double-quoted string literal
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Tokenizes a script, pairing each token with its byte range
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, ScriptError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(ScriptError {
                    position: SourceLocation::new(source).byte_to_position(lexer.span().start),
                    message: format!("invalid token '{}'", lexer.slice()),
                })
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("if iffy echo"),
            vec![Token::If, Token::Ident("iffy".to_string()), Token::Echo]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("// main slot\nchildren;"),
            vec![Token::Children, Token::Semi]
        );
    }

    #[test]
    fn test_strings_are_unescaped() {
        assert_eq!(
            kinds(r#""a\"b\n" 'it\'s' "é""#),
            vec![
                Token::Str("a\"b\n".to_string()),
                Token::Str("it's".to_string()),
                Token::Str("é".to_string()),
            ]
        );
    }

    #[test]
    fn test_quote_round_trips_through_lexer() {
        let text = "say \"hi\"\n\tand \\ leave";
        assert_eq!(kinds(&quote(text)), vec![Token::Str(text.to_string())]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a::b == !c != d && e || f = g"),
            vec![
                Token::Ident("a".to_string()),
                Token::PathSep,
                Token::Ident("b".to_string()),
                Token::EqEq,
                Token::Bang,
                Token::Ident("c".to_string()),
                Token::NotEq,
                Token::Ident("d".to_string()),
                Token::AndAnd,
                Token::Ident("e".to_string()),
                Token::OrOr,
                Token::Ident("f".to_string()),
                Token::Assign,
                Token::Ident("g".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_token_position() {
        let err = tokenize("echo 1;\n  #").unwrap_err();
        assert_eq!(err.position.line, 1);
        assert_eq!(err.position.column, 2);
    }
}
