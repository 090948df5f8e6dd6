//! The generated-code language
//!
//! Compiled templates are scripts in a small statement language executed by
//! [`crate::component::runtime::Interpreter`]:
//!
//! ```text
//! firstMixin = component_slots::first_defined;
//! fragment "card"(title) {
//!   if component_slots::slot("header", defined_vars()) {
//!     echo "<h1>";
//!   }
//! }
//! {
//!   component_slot = null;
//!   call "card"("Hi") {
//!     if component_slot == null || component_slot == "__main__" {
//!       component_slot___main__ && component_slot___main__();
//!       echo "Body";
//!     }
//!   }
//! }
//! ```

pub mod ast;
pub mod parser;
pub mod tokens;

pub use ast::{BinaryOp, Expr, Literal, Stmt};
pub use parser::parse_program;
pub use tokens::quote;
