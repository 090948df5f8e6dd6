//! Script grammar using chumsky
//!
//! ```text
//! program   := stmt* EOI
//! stmt      := IDENT '=' expr ';' | 'echo' expr ';' | 'children' ';'
//!            | 'if' expr block ('else' block)? | block
//!            | 'fragment' STR '(' IDENT,* ')' block
//!            | 'call' (STR | '(' expr ')') '(' expr,* ')' ('with' expr)? (block | ';')
//!            | expr ';'
//! expr      := or
//! or        := and ('||' and)*
//! and       := equality ('&&' equality)*
//! equality  := unary (('==' | '!=') unary)*
//! unary     := '!'* member
//! member    := atom ('.' IDENT)*
//! atom      := literal | path ('(' expr,* ')')? | '{' (key ':' expr),* '}' | '(' expr ')'
//! ```

use chumsky::prelude::*;
use chumsky::Stream;
use std::rc::Rc;

use super::ast::{BinaryOp, Expr, Literal, Stmt};
use super::tokens::{tokenize, Token};
use crate::component::ast::SourceLocation;
use crate::component::error::ScriptError;

type ParserError = Simple<Token>;

fn ident() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, token| match token {
        Token::Ident(name) => Ok(name),
        other => Err(ParserError::expected_input_found(span, None, Some(other))),
    })
}

fn string() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, token| match token {
        Token::Str(value) => Ok(value),
        other => Err(ParserError::expected_input_found(span, None, Some(other))),
    })
}

pub fn expression() -> impl Parser<Token, Expr, Error = ParserError> + Clone {
    recursive(|expr| {
        let literal = filter_map(|span, token| match token {
            Token::Null => Ok(Literal::Null),
            Token::True => Ok(Literal::Bool(true)),
            Token::False => Ok(Literal::Bool(false)),
            Token::Int(value) => Ok(Literal::Int(value)),
            Token::Str(value) => Ok(Literal::Str(value)),
            other => Err(ParserError::expected_input_found(span, None, Some(other))),
        })
        .map(Expr::Literal);

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let path = ident().then(just(Token::PathSep).ignore_then(ident()).repeated());
        let reference = path.then(args.or_not()).map(|((head, tail), args)| {
            let mut callee = vec![head];
            callee.extend(tail);
            match args {
                Some(args) => Expr::Call { callee, args },
                None if callee.len() == 1 => Expr::Var(callee.remove(0)),
                None => Expr::Path(callee),
            }
        });

        let object = ident()
            .or(string())
            .then_ignore(just(Token::Colon))
            .then(expr.clone())
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .delimited_by(just(Token::LBrace), just(Token::RBrace))
            .map(Expr::Object);

        let parenthesized = expr
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let atom = literal.or(reference).or(object).or(parenthesized);

        let member = atom
            .then(just(Token::Dot).ignore_then(ident()).repeated())
            .foldl(|object, field| Expr::Member(Box::new(object), field));

        let unary = just(Token::Bang)
            .repeated()
            .then(member)
            .foldr(|_, operand| Expr::Not(Box::new(operand)));

        let equality = unary
            .clone()
            .then(
                just(Token::EqEq)
                    .to(BinaryOp::Eq)
                    .or(just(Token::NotEq).to(BinaryOp::Ne))
                    .then(unary)
                    .repeated(),
            )
            .foldl(|left, (op, right)| Expr::Binary(op, Box::new(left), Box::new(right)));

        let and = equality
            .clone()
            .then(just(Token::AndAnd).to(BinaryOp::And).then(equality).repeated())
            .foldl(|left, (op, right)| Expr::Binary(op, Box::new(left), Box::new(right)));

        and.clone()
            .then(just(Token::OrOr).to(BinaryOp::Or).then(and).repeated())
            .foldl(|left, (op, right)| Expr::Binary(op, Box::new(left), Box::new(right)))
    })
}

pub fn program() -> impl Parser<Token, Vec<Stmt>, Error = ParserError> {
    let statement = recursive(|stmt| {
        let block = stmt
            .repeated()
            .delimited_by(just(Token::LBrace), just(Token::RBrace));

        let args = expression()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let assign = ident()
            .then_ignore(just(Token::Assign))
            .then(expression())
            .then_ignore(just(Token::Semi))
            .map(|(name, value)| Stmt::Assign(name, value));

        let echo = just(Token::Echo)
            .ignore_then(expression())
            .then_ignore(just(Token::Semi))
            .map(Stmt::Echo);

        let children = just(Token::Children)
            .then_ignore(just(Token::Semi))
            .to(Stmt::Children);

        let conditional = just(Token::If)
            .ignore_then(expression())
            .then(block.clone())
            .then(just(Token::Else).ignore_then(block.clone()).or_not())
            .map(|((condition, then), otherwise)| Stmt::If {
                condition,
                then,
                otherwise: otherwise.unwrap_or_default(),
            });

        let fragment = just(Token::Fragment)
            .ignore_then(string())
            .then(
                ident()
                    .separated_by(just(Token::Comma))
                    .allow_trailing()
                    .delimited_by(just(Token::LParen), just(Token::RParen)),
            )
            .then(block.clone())
            .map(|((name, params), body)| Stmt::Fragment {
                name,
                params,
                body: Rc::from(body),
            });

        let call_name = string()
            .map(|name| Expr::Literal(Literal::Str(name)))
            .or(expression().delimited_by(just(Token::LParen), just(Token::RParen)));

        let call = just(Token::Call)
            .ignore_then(call_name)
            .then(args)
            .then(just(Token::With).ignore_then(expression()).or_not())
            .then(
                block
                    .clone()
                    .map(Some)
                    .or(just(Token::Semi).to(None)),
            )
            .map(|(((name, args), attributes), content)| Stmt::Call {
                name,
                args,
                attributes,
                content: Rc::from(content.unwrap_or_default()),
            });

        let expr_stmt = expression()
            .then_ignore(just(Token::Semi))
            .map(Stmt::Expr);

        assign
            .or(echo)
            .or(children)
            .or(conditional)
            .or(fragment)
            .or(call)
            .or(block.map(Stmt::Scope))
            .or(expr_stmt)
    });

    statement.repeated().then_ignore(end())
}

/// Parses a whole script
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, ScriptError> {
    let tokens = tokenize(source)?;
    let eoi = source.len()..source.len();
    let stream = Stream::from_iter(eoi, tokens.into_iter());

    program().parse(stream).map_err(|errors| {
        let location = SourceLocation::new(source);
        match errors.into_iter().next() {
            Some(error) => ScriptError {
                position: location.byte_to_position(error.span().start),
                message: match error.found() {
                    Some(token) => format!("unexpected {}", token),
                    None => "unexpected end of script".to_string(),
                },
            },
            None => ScriptError {
                position: location.byte_to_position(source.len()),
                message: "invalid script".to_string(),
            },
        }
    })
}
