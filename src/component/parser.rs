//! Template parser
//!
//! Parsing happens in two steps, following the lexer's token stream:
//!
//! 1. [`grammar::document`] (chumsky) builds the intermediate [`Statement`] tree.
//! 2. [`lowering::lower`] turns statements into [`Node`]s, running the
//!    `after-parse-node` extension point on every completed node.

pub mod grammar;
pub mod intermediate;
pub mod lowering;

use chumsky::error::SimpleReason;
use chumsky::Parser as _;

use crate::component::ast::{Node, Position};
use crate::component::error::ParseError;
use crate::component::lexer::Token;
use crate::component::transforms::ExtensionPoint;
pub use intermediate::Statement;

/// Parses a token stream into a document node
pub fn parse(tokens: Vec<Token>, after_parse_node: &ExtensionPoint<Node>) -> Result<Node, ParseError> {
    let positions: Vec<Position> = tokens.iter().map(|token| token.position).collect();
    let end_position = positions.last().copied().unwrap_or_default();

    let statements = grammar::document().parse(tokens).map_err(|errors| {
        let Some(error) = errors.into_iter().next() else {
            return ParseError::syntax(end_position, "invalid template");
        };
        let position = positions
            .get(error.span().start)
            .copied()
            .unwrap_or(end_position);
        let message = match (error.reason(), error.found()) {
            (SimpleReason::Custom(message), _) => message.clone(),
            (_, Some(token)) => format!("unexpected {}", token),
            (_, None) => "unexpected end of template".to_string(),
        };
        ParseError::syntax(position, message)
    })?;

    let mut document = Node::document();
    for statement in statements {
        document.push_child(lowering::lower(statement, after_parse_node)?);
    }
    Ok(after_parse_node.run(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ast::{AstNode, CallName, NodeKind};
    use crate::component::lexer::{host_scanners, Lexer};

    fn parse_source(source: &str) -> Result<Node, ParseError> {
        let lexer = Lexer::new(host_scanners(
            &["mixin".to_string()],
            &["slot".to_string()],
        ));
        let tokens = lexer.tokenize(source).unwrap();
        parse(tokens, &ExtensionPoint::new("after-parse-node"))
    }

    #[test]
    fn test_fragment_and_call() {
        let document = parse_source("mixin foo(num)\n  p= num\n  block\n+foo(5)\n  | Hello").unwrap();
        let fragment = &document.children()[0];
        let call = &document.children()[1];

        assert_eq!(
            fragment.kind,
            NodeKind::Fragment {
                name: "foo".to_string(),
                params: vec!["num".to_string()],
            }
        );
        assert_eq!(fragment.children().len(), 2);
        assert_eq!(fragment.children()[0].children()[0].node_type(), "Expression");
        assert_eq!(fragment.children()[1].kind, NodeKind::Block);

        assert_eq!(
            call.kind,
            NodeKind::Call {
                name: CallName::Plain("foo".to_string()),
                arguments: vec!["5".to_string()],
                classes: Vec::new(),
            }
        );
        assert_eq!(call.children()[0].value(), Some("Hello"));
    }

    #[test]
    fn test_expansion_nests_statements() {
        let document = parse_source("article(data-attr=obj.a): slot\n").unwrap();
        let article = &document.children()[0];

        assert_eq!(article.node_type(), "Element");
        assert!(article.children()[0].is_keyword("slot"));
        assert_eq!(article.children()[0].parent(), Some(article.id()));
    }

    #[test]
    fn test_nested_indentation() {
        let document = parse_source("ul\n  li\n    | a\n  li b\np").unwrap();
        assert_eq!(document.children().len(), 2);
        let list = &document.children()[0];
        assert_eq!(list.children().len(), 2);
        assert_eq!(list.children()[0].children()[0].value(), Some("a"));
        assert_eq!(list.children()[1].children()[0].value(), Some("b"));
    }

    #[test]
    fn test_stray_class_is_a_syntax_error() {
        let lexer = Lexer::new(host_scanners(&[], &[]));
        let mut tokens = lexer.tokenize("p").unwrap();
        tokens.insert(
            0,
            Token::new(
                crate::component::lexer::TokenKind::Class("x".to_string()),
                Position::new(0, 0),
            ),
        );
        let err = parse(tokens, &ExtensionPoint::new("after-parse-node")).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }
}
