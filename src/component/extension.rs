//! Compiler extensions
//!
//! An [`Extension`] contributes scanners to the lexer, keyword codegen to the formatter,
//! and stages to the [`Pipeline`] extension points. The compiler receives the list of
//! active extensions at construction; enabling or disabling one means adding it to or
//! leaving it out of that list.

pub mod component;

use crate::component::ast::Node;
use crate::component::error::FormatError;
use crate::component::lexer::Scanner;
use crate::component::transforms::Pipeline;

pub use component::ComponentExtension;

/// Code emitted around the children of a keyword node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordOutput {
    pub begin: String,
    pub end: String,
}

/// Turns a keyword node into the statements wrapping its children
pub trait KeywordCodegen {
    fn generate(&self, value: &str, node: &Node) -> Result<KeywordOutput, FormatError>;
}

pub trait Extension {
    fn name(&self) -> &'static str;

    /// Scanners tried before the host scanners
    fn scanners(&self) -> Vec<Box<dyn Scanner>> {
        Vec::new()
    }

    /// Keyword names with their codegen
    fn keywords(&self) -> Vec<(String, Box<dyn KeywordCodegen>)> {
        Vec::new()
    }

    /// Registers stages on the pipeline's extension points
    fn install(&self, _pipeline: &mut Pipeline) {}
}
