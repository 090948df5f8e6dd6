//! Statement and expression tree of generated scripts

use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Var(String),
    /// A `::`-qualified name
    Path(Vec<String>),
    Member(Box<Expr>, String),
    /// A call on a plain or `::`-qualified name
    Call {
        callee: Vec<String>,
        args: Vec<Expr>,
    },
    Object(Vec<(String, Expr)>),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign(String, Expr),
    Echo(Expr),
    Expr(Expr),
    If {
        condition: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    /// A nested block with its own copy of the enclosing scope
    Scope(Vec<Stmt>),
    Fragment {
        name: String,
        params: Vec<String>,
        body: Rc<[Stmt]>,
    },
    Call {
        name: Expr,
        args: Vec<Expr>,
        attributes: Option<Expr>,
        content: Rc<[Stmt]>,
    },
    /// Renders the caller's content of the current fragment
    Children,
}
