//! Intermediate statement tree
//!
//! The grammar produces [`Statement`]s that mirror the template's line structure. They are
//! lowered into [`Node`](crate::component::ast::Node)s afterwards, which is where
//! extension hooks run.

use crate::component::ast::{CallName, Position};

/// Inline content following a tag or call on the same line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Element {
        tag: String,
        classes: Vec<String>,
        arguments: Vec<String>,
        inline: Option<Inline>,
    },
    Call {
        name: CallName,
        classes: Vec<String>,
        arguments: Vec<String>,
        inline: Option<Inline>,
    },
    Fragment {
        name: String,
        params: Vec<String>,
    },
    Keyword {
        name: String,
        value: String,
    },
    Text(String),
    Expression(String),
    Code(String),
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub head: Head,
    pub position: Position,
    pub children: Vec<Statement>,
}

impl Statement {
    /// Folds a chain of expanded heads (`a: b: c`) into nested statements, the last one
    /// owning `children`
    pub fn from_chain(chain: Vec<(Head, Position)>, children: Vec<Statement>) -> Option<Self> {
        chain
            .into_iter()
            .rev()
            .fold(None, |inner: Option<Statement>, (head, position)| {
                let children = match inner {
                    Some(statement) => vec![statement],
                    None => children.clone(),
                };
                Some(Statement {
                    head,
                    position,
                    children,
                })
            })
    }
}
