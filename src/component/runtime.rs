//! Execution of generated scripts
//!
//! The [`Interpreter`] walks a parsed script, [`dispatch`] implements the slot decision
//! called from every `slot` region, and [`registry`] tracks the defined fragments.

pub mod dispatch;
pub mod interpreter;
pub mod registry;
pub mod value;

pub use interpreter::Interpreter;
pub use value::{escape_html, Callback, ChildrenFn, Context, Native, Value};
