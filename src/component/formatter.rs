//! Serialization of syntax trees into scripts
//!
//! Output is one statement per line, indented by two spaces per block level. Literal
//! markup is written with `echo "..."`, expressions with `echo escape(...)`.

use std::collections::HashMap;

use log::trace;

use super::ast::{AstNode, Attribute, CallName, Node, NodeKind};
use super::error::FormatError;
use super::extension::KeywordCodegen;
use super::lexer::interpolation::{segments, Segment};
use super::script::quote;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Default)]
struct Writer {
    code: String,
    depth: usize,
}

impl Writer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.code.push_str("  ");
        }
        self.code.push_str(text);
        self.code.push('\n');
    }

    fn echo(&mut self, literal: &str) {
        if !literal.is_empty() {
            self.line(&format!("echo {};", quote(literal)));
        }
    }

    fn echo_escaped(&mut self, expr: &str) {
        self.line(&format!("echo escape({});", expr.trim()));
    }
}

/// Formats documents, delegating keyword nodes to their registered codegen
pub struct Formatter {
    keywords: HashMap<String, Box<dyn KeywordCodegen>>,
}

impl Formatter {
    pub fn new(keywords: HashMap<String, Box<dyn KeywordCodegen>>) -> Self {
        Formatter { keywords }
    }

    pub fn format(&self, node: &Node) -> Result<String, FormatError> {
        let mut writer = Writer::default();
        self.node(node, &mut writer)?;
        Ok(writer.code)
    }

    fn children(&self, nodes: &[Node], writer: &mut Writer) -> Result<(), FormatError> {
        nodes.iter().try_for_each(|child| self.node(child, writer))
    }

    fn nested(&self, nodes: &[Node], writer: &mut Writer) -> Result<(), FormatError> {
        writer.depth += 1;
        let result = self.children(nodes, writer);
        writer.depth -= 1;
        result
    }

    fn node(&self, node: &Node, writer: &mut Writer) -> Result<(), FormatError> {
        match &node.kind {
            NodeKind::Document => self.children(node.children(), writer),
            NodeKind::Text { value } => self.text(value, writer),
            NodeKind::Expression { value } => {
                writer.echo_escaped(value);
                Ok(())
            }
            NodeKind::Element {
                tag,
                classes,
                attributes,
            } => self.element(tag, classes, attributes, node.children(), writer),
            NodeKind::Code { value: None, .. } => self.guard(node.children(), writer),
            NodeKind::Code {
                value: Some(value), ..
            } => self.code(value, node.children(), writer),
            NodeKind::Fragment { name, params } => {
                writer.line(&format!("fragment {}({}) {{", quote(name), params.join(", ")));
                self.nested(node.children(), writer)?;
                writer.line("}");
                Ok(())
            }
            NodeKind::Call { .. } => self.call(node, writer),
            NodeKind::Keyword { name, value } => {
                let codegen = self
                    .keywords
                    .get(name)
                    .ok_or_else(|| FormatError::UnknownKeyword(name.clone()))?;
                let output = codegen.generate(value, node)?;
                writer.line(&output.begin);
                self.nested(node.children(), writer)?;
                writer.line(&output.end);
                Ok(())
            }
            NodeKind::Block => {
                writer.line("children;");
                Ok(())
            }
        }
    }

    fn text(&self, text: &str, writer: &mut Writer) -> Result<(), FormatError> {
        let parts = segments(text).map_err(|_| FormatError::Interpolation(text.to_string()))?;
        for part in parts {
            match part {
                Segment::Literal(literal) => writer.echo(&literal),
                Segment::Interpolation(expr) => writer.echo_escaped(&expr),
            }
        }
        Ok(())
    }

    fn element(
        &self,
        tag: &str,
        classes: &[String],
        attributes: &[Attribute],
        children: &[Node],
        writer: &mut Writer,
    ) -> Result<(), FormatError> {
        let mut open = format!("<{}", tag);
        if !classes.is_empty() {
            open.push_str(&format!(" class=\"{}\"", classes.join(" ")));
        }
        for attribute in attributes {
            if attribute.value == "true" {
                open.push(' ');
                open.push_str(&attribute.name);
                continue;
            }
            open.push_str(&format!(" {}=\"", attribute.name));
            writer.echo(&open);
            writer.echo_escaped(&attribute.value);
            open = "\"".to_string();
        }
        open.push('>');
        writer.echo(&open);

        if VOID_ELEMENTS.contains(&tag) {
            return Ok(());
        }
        self.children(children, writer)?;
        writer.echo(&format!("</{}>", tag));
        Ok(())
    }

    /// A valueless code node: a conditional on its first text child
    fn guard(&self, children: &[Node], writer: &mut Writer) -> Result<(), FormatError> {
        match children.split_first() {
            Some((first, body)) if matches!(first.kind, NodeKind::Text { .. }) => {
                writer.line(&format!("if {} {{", first.value().unwrap_or_default()));
                self.nested(body, writer)?;
            }
            _ => {
                writer.line("{");
                self.nested(children, writer)?;
            }
        }
        writer.line("}");
        Ok(())
    }

    fn code(&self, value: &str, children: &[Node], writer: &mut Writer) -> Result<(), FormatError> {
        if value.starts_with("//") {
            writer.line(value);
            return self.children(children, writer);
        }
        match (value.is_empty(), children.is_empty()) {
            (true, true) => {}
            (false, true) => writer.line(&format!("{};", value.trim_end_matches(';'))),
            (true, false) => {
                writer.line("{");
                self.nested(children, writer)?;
                writer.line("}");
            }
            (false, false) => {
                writer.line(&format!("{} {{", value));
                self.nested(children, writer)?;
                writer.line("}");
            }
        }
        Ok(())
    }

    /// A call, with leading generated statements hoisted in front of it so they run in
    /// the caller's scope rather than inside the deferred content
    fn call(&self, node: &Node, writer: &mut Writer) -> Result<(), FormatError> {
        let NodeKind::Call {
            name,
            arguments,
            classes,
        } = &node.kind
        else {
            return Ok(());
        };

        let hoisted = node
            .children()
            .iter()
            .take_while(|child| child.is_opaque() && child.value().is_some())
            .count();
        let (prelude, content) = node.children().split_at(hoisted);

        let mut header = match name {
            CallName::Plain(name) => format!("call {}", quote(name)),
            CallName::Interpolated(expr) => format!("call ({})", expr),
        };
        header.push_str(&format!("({})", arguments.join(", ")));
        if !classes.is_empty() {
            header.push_str(&format!(" with {{class: {}}}", quote(&classes.join(" "))));
        }

        if !prelude.is_empty() {
            writer.line("{");
            writer.depth += 1;
            for statement in prelude {
                self.node(statement, writer)?;
            }
        }
        if content.is_empty() {
            writer.line(&format!("{};", header));
        } else {
            writer.line(&format!("{} {{", header));
            self.nested(content, writer)?;
            writer.line("}");
        }
        if !prelude.is_empty() {
            writer.depth -= 1;
            writer.line("}");
        }

        trace!("formatted call {}", node.display_label());
        Ok(())
    }
}
