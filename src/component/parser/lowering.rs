//! Lowering of statements into syntax nodes
//!
//! Nodes are completed bottom-up: a node's children are lowered (and handed to the
//! `after-parse-node` hook) before the node itself is handed to it.

use super::intermediate::{Head, Inline, Statement};
use crate::component::ast::{Attribute, Node, NodeKind};
use crate::component::error::ParseError;
use crate::component::transforms::ExtensionPoint;

pub fn lower(statement: Statement, hook: &ExtensionPoint<Node>) -> Result<Node, ParseError> {
    let position = Some(statement.position);
    let mut inline_child = None;

    let kind = match statement.head {
        Head::Element {
            tag,
            classes,
            arguments,
            inline,
        } => {
            inline_child = inline;
            NodeKind::Element {
                tag,
                classes,
                attributes: arguments.iter().map(|arg| split_attribute(arg)).collect(),
            }
        }
        Head::Call {
            name,
            classes,
            arguments,
            inline,
        } => {
            inline_child = inline;
            NodeKind::Call {
                name,
                arguments,
                classes,
            }
        }
        Head::Fragment { name, params } => NodeKind::Fragment { name, params },
        Head::Keyword { name, value } => NodeKind::Keyword { name, value },
        Head::Text(value) => NodeKind::Text { value },
        Head::Expression(value) => NodeKind::Expression { value },
        Head::Code(value) => NodeKind::Code {
            value: Some(value),
            opaque: false,
        },
        Head::Block => NodeKind::Block,
    };

    let mut node = Node::new(kind, position);

    if let Some(inline) = inline_child {
        let child = match inline {
            Inline::Text(value) => Node::new(NodeKind::Text { value }, position),
            Inline::Expression(value) => Node::new(NodeKind::Expression { value }, position),
        };
        node.push_child(hook.run(child)?);
    }

    for child in statement.children {
        node.push_child(lower(child, hook)?);
    }

    Ok(hook.run(node)?)
}

/// Splits `name=value` at the first top-level assignment; a bare name is a boolean
/// attribute
pub fn split_attribute(argument: &str) -> Attribute {
    let bytes = argument.as_bytes();
    let mut quote: Option<u8> = None;
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        match quote {
            Some(_) if byte == b'\\' => index += 1,
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None if byte == b'"' || byte == b'\'' => quote = Some(byte),
            None if byte == b'=' => {
                let previous = index.checked_sub(1).map(|i| bytes[i]);
                let next = bytes.get(index + 1).copied();
                let comparison = matches!(previous, Some(b'!' | b'<' | b'>' | b'='))
                    || next == Some(b'=');
                if !comparison {
                    return Attribute {
                        name: argument[..index].trim().to_string(),
                        value: argument[index + 1..].trim().to_string(),
                    };
                }
                if next == Some(b'=') {
                    index += 1;
                }
            }
            None => {}
        }
        index += 1;
    }

    Attribute {
        name: argument.trim().to_string(),
        value: "true".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ast::Position;

    #[test]
    fn test_split_attribute() {
        let attr = split_attribute("data-attr=obj.a");
        assert_eq!(attr.name, "data-attr");
        assert_eq!(attr.value, "obj.a");

        let attr = split_attribute("title = \"a=b\"");
        assert_eq!(attr.name, "title");
        assert_eq!(attr.value, "\"a=b\"");

        let attr = split_attribute("checked");
        assert_eq!(attr.name, "checked");
        assert_eq!(attr.value, "true");
    }

    #[test]
    fn test_hook_sees_children_before_parent() {
        let statement = Statement {
            head: Head::Element {
                tag: "p".to_string(),
                classes: Vec::new(),
                arguments: Vec::new(),
                inline: Some(Inline::Text("hi".to_string())),
            },
            position: Position::new(0, 0),
            children: Vec::new(),
        };

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = seen.clone();
        let mut hook = ExtensionPoint::new("after-parse-node");
        hook.register(
            "record",
            crate::component::transforms::Transform::from_fn(move |node: Node| {
                record
                    .lock()
                    .unwrap()
                    .push(crate::component::ast::AstNode::node_type(&node));
                Ok(node)
            }),
        );

        let node = lower(statement, &hook).unwrap();
        assert_eq!(node.children().len(), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["Text", "Element"]);
    }
}
