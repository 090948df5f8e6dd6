//! Main module for component-slots functionality
//!
//! Data flows through the modules in this order:
//!
//!     source text → [lexer] → [parser] (fires `after-parse-node`) → [formatter]
//!     (fires `before-emit-output`) → generated [script] → [runtime] interpreter
//!
//! The slot-specific behavior is contributed by [extension::component::ComponentExtension];
//! everything else is the minimal host pipeline it plugs into.

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod extension;
pub mod formatter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod script;
pub mod transforms;
