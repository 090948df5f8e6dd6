//! Token definitions for templates
//!
//! Templates are scanned line by line. Each line yields the tokens of one or more
//! statements (several when `: ` expansion is used), followed by a `Newline`.
//! Indentation changes are expressed by `Indent` and `Outdent` tokens placed before the
//! first token of a line.

use crate::component::ast::{CallName, Position};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Indent,
    Outdent,
    Newline,
    /// An element name (`article`)
    Tag(String),
    /// A `.class` suffix
    Class(String),
    /// A parenthesized, comma-separated list, split at the top level
    Arguments(Vec<String>),
    /// Literal text, possibly containing `#{...}` interpolations
    Text(String),
    /// An expression whose value is output (`= expr`)
    Expression(String),
    /// A user statement (`- stmt`)
    Code(String),
    /// An extension keyword and the rest of its line
    Keyword { name: String, value: String },
    /// A fragment definition keyword and the fragment name
    FragmentDefinition(String),
    /// A fragment call marker and the fragment name
    Call(CallName),
    /// Output of the caller's content
    Block,
    /// `: ` block expansion, the rest of the line is a nested statement
    Expansion,
}

impl TokenKind {
    pub fn is_indentation(&self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Outdent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Token { kind, position }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Indent => write!(f, "<indent>"),
            TokenKind::Outdent => write!(f, "<outdent>"),
            TokenKind::Newline => write!(f, "<newline>"),
            TokenKind::Tag(tag) => write!(f, "tag {}", tag),
            TokenKind::Class(class) => write!(f, "class .{}", class),
            TokenKind::Arguments(args) => write!(f, "arguments ({})", args.join(", ")),
            TokenKind::Text(text) => write!(f, "text {:?}", text),
            TokenKind::Expression(expr) => write!(f, "expression {}", expr),
            TokenKind::Code(code) => write!(f, "code {}", code),
            TokenKind::Keyword { name, value } => write!(f, "keyword {} {:?}", name, value),
            TokenKind::FragmentDefinition(name) => write!(f, "fragment {}", name),
            TokenKind::Call(name) => write!(f, "call {}", name),
            TokenKind::Block => write!(f, "block"),
            TokenKind::Expansion => write!(f, "expansion"),
        }
    }
}
