//! Syntax node definitions
//!
//! A template compiles into a tree of [`Node`]s. Every node carries a stable
//! [`NodeId`], the id of its owning parent, its source position, and an ordered list of
//! owned children. The parent link is maintained by the child mutation methods, so
//! moving a node under a new owner keeps its identity and only changes its parent.

use super::position::Position;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a node, stable across moves in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name of a fragment call: a plain identifier or an expression computing it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum CallName {
    Plain(String),
    Interpolated(String),
}

impl fmt::Display for CallName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallName::Plain(name) => write!(f, "{}", name),
            CallName::Interpolated(expr) => write!(f, "#{{{}}}", expr),
        }
    }
}

/// An `name=expression` pair on an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Document,
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: Vec<Attribute>,
    },
    /// Raw text; template text, or guard condition source when first child of a code node
    Text { value: String },
    /// An escaped expression output (`= expr`)
    Expression { value: String },
    /// A statement. Without a value it is a conditional whose condition is its first
    /// text child. Opaque code is generated and never rewritten again.
    Code { value: Option<String>, opaque: bool },
    /// A fragment definition (`mixin name(params)`)
    Fragment { name: String, params: Vec<String> },
    /// A fragment call (`+name(args)`)
    Call {
        name: CallName,
        arguments: Vec<String>,
        classes: Vec<String>,
    },
    /// A keyword handled by an extension (`slot title`)
    Keyword { name: String, value: String },
    /// Output of the caller's content (`block`)
    Block,
}

/// A syntax tree node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: NodeId,
    pub kind: NodeKind,
    pub position: Option<Position>,
    parent: Option<NodeId>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, position: Option<Position>) -> Self {
        Node {
            id: NodeId::fresh(),
            kind,
            position,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn document() -> Self {
        Node::new(NodeKind::Document, Some(Position::default()))
    }

    pub fn text(value: impl Into<String>, position: Option<Position>) -> Self {
        Node::new(
            NodeKind::Text {
                value: value.into(),
            },
            position,
        )
    }

    /// A plain user statement, subject to further transformation
    pub fn code(value: impl Into<String>, position: Option<Position>) -> Self {
        Node::new(
            NodeKind::Code {
                value: Some(value.into()),
                opaque: false,
            },
            position,
        )
    }

    /// A generated statement that no later pass will rewrite
    pub fn opaque_code(value: Option<String>, position: Option<Position>) -> Self {
        Node::new(
            NodeKind::Code {
                value,
                opaque: true,
            },
            position,
        )
    }

    pub fn call(name: CallName, arguments: Vec<String>, position: Option<Position>) -> Self {
        Node::new(
            NodeKind::Call {
                name,
                arguments,
                classes: Vec::new(),
            },
            position,
        )
    }

    pub fn keyword(
        name: impl Into<String>,
        value: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Node::new(
            NodeKind::Keyword {
                name: name.into(),
                value: value.into(),
            },
            position,
        )
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_at(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn push_child(&mut self, mut child: Node) {
        child.parent = Some(self.id);
        self.children.push(child);
    }

    /// Builder form of [`Node::push_child`]
    pub fn with_child(mut self, child: Node) -> Self {
        self.push_child(child);
        self
    }

    /// Replaces all children, taking ownership of the new ones
    pub fn set_children(&mut self, children: Vec<Node>) {
        let id = self.id;
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent = Some(id);
                child
            })
            .collect();
    }

    /// Removes and returns all children, leaving them detached
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
            .into_iter()
            .map(|mut child| {
                child.parent = None;
                child
            })
            .collect()
    }

    /// Returns the deepest last descendant, following last children
    pub fn last_leaf_mut(&mut self) -> &mut Node {
        if self.children.is_empty() {
            return self;
        }
        let last = self.children.len() - 1;
        self.children[last].last_leaf_mut()
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, NodeKind::Call { .. })
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self.kind, NodeKind::Code { opaque: true, .. })
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, NodeKind::Keyword { name, .. } if name == keyword)
    }

    /// The text payload of text, expression, and valued code nodes
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value } | NodeKind::Expression { value } => Some(value),
            NodeKind::Code { value, .. } => value.as_deref(),
            NodeKind::Keyword { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Common interface for inspecting nodes
pub trait AstNode {
    fn node_type(&self) -> &'static str;
    fn display_label(&self) -> String;
}

impl AstNode for Node {
    fn node_type(&self) -> &'static str {
        match self.kind {
            NodeKind::Document => "Document",
            NodeKind::Element { .. } => "Element",
            NodeKind::Text { .. } => "Text",
            NodeKind::Expression { .. } => "Expression",
            NodeKind::Code { .. } => "Code",
            NodeKind::Fragment { .. } => "Fragment",
            NodeKind::Call { .. } => "Call",
            NodeKind::Keyword { .. } => "Keyword",
            NodeKind::Block => "Block",
        }
    }

    fn display_label(&self) -> String {
        match &self.kind {
            NodeKind::Document => String::new(),
            NodeKind::Element { tag, classes, .. } => {
                let mut label = tag.clone();
                for class in classes {
                    label.push('.');
                    label.push_str(class);
                }
                label
            }
            NodeKind::Text { value } | NodeKind::Expression { value } => value.clone(),
            NodeKind::Code { value, opaque } => {
                let body = value.clone().unwrap_or_else(|| "<guard>".to_string());
                if *opaque {
                    format!("{} [opaque]", body)
                } else {
                    body
                }
            }
            NodeKind::Fragment { name, params } => format!("{}({})", name, params.join(", ")),
            NodeKind::Call {
                name, arguments, ..
            } => format!("+{}({})", name, arguments.join(", ")),
            NodeKind::Keyword { name, value } if value.is_empty() => name.clone(),
            NodeKind::Keyword { name, value } => format!("{} {}", name, value),
            NodeKind::Block => "block".to_string(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_tree(node: &Node, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let label = node.display_label();
            if label.is_empty() {
                writeln!(f, "{}{}", "  ".repeat(depth), node.node_type())?;
            } else {
                writeln!(f, "{}{} {}", "  ".repeat(depth), node.node_type(), label)?;
            }
            for child in node.children() {
                write_tree(child, depth + 1, f)?;
            }
            Ok(())
        }
        write_tree(self, 0, f)
    }
}
