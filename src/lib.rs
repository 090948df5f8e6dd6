//! # component-slots
//!
//! Slot-aware fragment calls for an indentation-based template compiler.
//!
//! A fragment (`mixin` or `component`) can declare several named insertion points with
//! `slot NAME`, and a call site can fill each of them in a single invocation:
//!
//! ```text
//! mixin card(obj)
//!   slot title
//!   article(data-attr=obj.a): slot
//! +card({a: 5})
//!   slot title
//!     | Title
//!   | Content
//! ```
//!
//! The pieces that make this work live under [`component`]:
//!
//! - the call scanner recognizes `+name`, `@name` and `+#{expr}` invocations,
//! - the call rewriter wraps bare call content into default-slot guards,
//! - the slot keyword codegen turns `slot NAME` into a runtime-guarded region,
//! - the runtime dispatcher ([`slot`]) decides, per render, which region is visible.

pub mod component;

pub use component::compiler::Compiler;
pub use component::config::{load_defaults, ComponentConfig, Loader};
pub use component::error::ComponentError;
pub use component::runtime::dispatch::slot;
pub use component::runtime::registry::first_defined;
pub use component::runtime::{Context, Value};
