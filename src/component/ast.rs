//! Syntax tree for templates
//!
//! - `position` - line/column positions and byte offset conversion
//! - `node` - the [`Node`] tree and its kinds

pub mod node;
pub mod position;

pub use node::{AstNode, Attribute, CallName, Node, NodeId, NodeKind};
pub use position::{Position, SourceLocation};

/// Serializes a tree to pretty-printed JSON
pub fn to_json(node: &Node) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_keeps_structure() {
        let node = Node::document().with_child(Node::keyword("slot", "title", None));
        let json = to_json(&node).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"]["type"], "Document");
        assert_eq!(value["children"][0]["kind"]["type"], "Keyword");
        assert_eq!(value["children"][0]["kind"]["name"], "slot");
        assert_eq!(value["children"][0]["parent"], value["id"]);
    }
}
