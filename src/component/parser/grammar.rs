//! Template grammar using chumsky
//!
//! ```text
//! document  := statement* EOI
//! statement := head (Expansion head)* Newline (Indent statement+ Outdent)?
//! ```

use chumsky::prelude::*;

use super::intermediate::{Head, Inline, Statement};
use crate::component::ast::{CallName, Position};
use crate::component::lexer::{Token, TokenKind};

type ParserError = Simple<Token>;

fn token(kind: TokenKind) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    filter(move |t: &Token| t.kind == kind)
}

fn class() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, t: Token| match t.kind {
        TokenKind::Class(class) => Ok(class),
        _ => Err(ParserError::expected_input_found(span, None, Some(t))),
    })
}

fn arguments() -> impl Parser<Token, Vec<String>, Error = ParserError> + Clone {
    filter_map(|span, t: Token| match t.kind {
        TokenKind::Arguments(args) => Ok(args),
        _ => Err(ParserError::expected_input_found(span, None, Some(t))),
    })
}

fn inline() -> impl Parser<Token, Inline, Error = ParserError> + Clone {
    filter_map(|span, t: Token| match t.kind {
        TokenKind::Text(text) => Ok(Inline::Text(text)),
        TokenKind::Expression(expr) => Ok(Inline::Expression(expr)),
        _ => Err(ParserError::expected_input_found(span, None, Some(t))),
    })
}

enum Opener {
    Tag(String),
    Call(CallName),
}

/// Tag or call head with its suffixes
fn element_like() -> impl Parser<Token, (Head, Position), Error = ParserError> + Clone {
    let opener = filter_map(|span, t: Token| match t.kind {
        TokenKind::Tag(tag) => Ok((Opener::Tag(tag), t.position)),
        TokenKind::Call(name) => Ok((Opener::Call(name), t.position)),
        kind => Err(ParserError::expected_input_found(
            span,
            None,
            Some(Token::new(kind, t.position)),
        )),
    });

    opener
        .then(class().repeated())
        .then(arguments().or_not())
        .then(inline().or_not())
        .map(|((((opener, position), classes), arguments), inline)| {
            let arguments = arguments.unwrap_or_default();
            let head = match opener {
                Opener::Call(name) => Head::Call {
                    name,
                    classes,
                    arguments,
                    inline,
                },
                Opener::Tag(tag) => Head::Element {
                    tag,
                    classes,
                    arguments,
                    inline,
                },
            };
            (head, position)
        })
}

fn fragment() -> impl Parser<Token, (Head, Position), Error = ParserError> + Clone {
    filter_map(|span, t: Token| match t.kind {
        TokenKind::FragmentDefinition(name) => Ok((name, t.position)),
        _ => Err(ParserError::expected_input_found(span, None, Some(t))),
    })
    .then(arguments().or_not())
    .map(|((name, position), params)| {
        (
            Head::Fragment {
                name,
                params: params.unwrap_or_default(),
            },
            position,
        )
    })
}

fn simple() -> impl Parser<Token, (Head, Position), Error = ParserError> + Clone {
    filter_map(|span, t: Token| {
        let head = match t.kind {
            TokenKind::Text(text) => Head::Text(text),
            TokenKind::Expression(expr) => Head::Expression(expr),
            TokenKind::Code(code) => Head::Code(code),
            TokenKind::Keyword { name, value } => Head::Keyword { name, value },
            TokenKind::Block => Head::Block,
            kind => {
                return Err(ParserError::expected_input_found(
                    span,
                    None,
                    Some(Token::new(kind, t.position)),
                ))
            }
        };
        Ok((head, t.position))
    })
}

fn head() -> impl Parser<Token, (Head, Position), Error = ParserError> + Clone {
    element_like().or(fragment()).or(simple())
}

pub fn document() -> impl Parser<Token, Vec<Statement>, Error = ParserError> {
    let statement = recursive(|statement| {
        let block = token(TokenKind::Indent)
            .ignore_then(statement.repeated().at_least(1))
            .then_ignore(token(TokenKind::Outdent));

        head()
            .separated_by(token(TokenKind::Expansion))
            .allow_trailing()
            .at_least(1)
            .then_ignore(token(TokenKind::Newline))
            .then(block.or_not())
            .try_map(|(chain, block), span| {
                Statement::from_chain(chain, block.unwrap_or_default())
                    .ok_or_else(|| ParserError::custom(span, "empty statement"))
            })
    });

    statement.repeated().then_ignore(end())
}
