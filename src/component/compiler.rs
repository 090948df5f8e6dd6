//! Compiler facade
//!
//! Ties the stages together: lexing with the host and extension scanners, parsing with
//! the `after-parse-node` hook, formatting with extension keyword codegen, and the
//! `before-emit-output` hook on the finished script.

use std::collections::HashMap;

use log::debug;

use super::ast::Node;
use super::config::ComponentConfig;
use super::error::ComponentError;
use super::extension::{ComponentExtension, Extension, KeywordCodegen};
use super::formatter::Formatter;
use super::lexer::{host_scanners, Lexer};
use super::parser;
use super::runtime::{Context, Interpreter};
use super::script::parse_program;
use super::transforms::Pipeline;

/// Script text produced for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledOutput {
    code: String,
}

impl CompiledOutput {
    pub fn new(code: String) -> Self {
        CompiledOutput { code }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Inserts code ahead of everything emitted so far
    pub fn prepend_code(&mut self, code: &str) {
        self.code.insert_str(0, code);
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

pub struct Compiler {
    config: ComponentConfig,
    lexer: Lexer,
    formatter: Formatter,
    pipeline: Pipeline,
    extensions: Vec<&'static str>,
}

impl Compiler {
    pub fn new(config: ComponentConfig, extensions: Vec<Box<dyn Extension>>) -> Self {
        let mut scanners = Vec::new();
        let mut keywords: HashMap<String, Box<dyn KeywordCodegen>> = HashMap::new();
        let mut pipeline = Pipeline::new();
        let mut names = Vec::with_capacity(extensions.len());

        for extension in &extensions {
            scanners.extend(extension.scanners());
            keywords.extend(extension.keywords());
            extension.install(&mut pipeline);
            names.push(extension.name());
        }

        let keyword_names: Vec<String> = keywords.keys().cloned().collect();
        scanners.extend(host_scanners(&config.syntax.mixin_keywords, &keyword_names));
        debug!("compiler extensions: {:?}", names);

        Compiler {
            config,
            lexer: Lexer::new(scanners),
            formatter: Formatter::new(keywords),
            pipeline,
            extensions: names,
        }
    }

    /// A compiler with the component extension enabled, using `config` for both
    pub fn with_config(config: ComponentConfig) -> Self {
        let extension = ComponentExtension::new(config.clone());
        Compiler::new(config, vec![Box::new(extension)])
    }

    pub fn with_defaults() -> Self {
        Compiler::with_config(ComponentConfig::default())
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    pub fn extension_names(&self) -> &[&'static str] {
        &self.extensions
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Lexes and parses a template, with every `after-parse-node` stage applied
    pub fn parse(&self, source: &str) -> Result<Node, ComponentError> {
        let tokens = self.lexer.tokenize(source)?;
        Ok(parser::parse(tokens, &self.pipeline.after_parse_node)?)
    }

    pub fn compile(&self, source: &str) -> Result<CompiledOutput, ComponentError> {
        let document = self.parse(source)?;
        let code = self.formatter.format(&document)?;
        let output = self.pipeline.before_emit_output.run(CompiledOutput::new(code))?;
        debug!("compiled {} bytes of script", output.code().len());
        Ok(output)
    }

    /// Compiles and runs a template
    pub fn render(&self, source: &str, context: Context) -> Result<String, ComponentError> {
        let output = self.compile(source)?;
        let program = parse_program(output.code())?;
        Ok(Interpreter::new(&self.config).run(&program, context)?)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::error::FormatError;

    #[test]
    fn test_without_extensions_slot_is_plain_markup() {
        let compiler = Compiler::new(ComponentConfig::default(), Vec::new());
        assert!(compiler.extension_names().is_empty());
        assert!(compiler.pipeline().after_parse_node.stages().is_empty());

        let html = compiler.render("slot\n", Context::new()).unwrap();
        assert_eq!(html, "<slot></slot>");
    }

    #[test]
    fn test_default_compiler_has_component_extension() {
        let compiler = Compiler::default();
        assert_eq!(compiler.extension_names(), ["component"]);
    }

    #[test]
    fn test_compile_prepends_helpers() {
        let output = Compiler::with_defaults().compile("p hello\n").unwrap();
        assert!(output
            .code()
            .starts_with("firstMixin = component_slots::first_defined;\nfirstComponent = firstMixin;\n"));
        assert!(output.code().ends_with("echo \"<p>\";\necho \"hello\";\necho \"</p>\";\n"));
    }

    #[test]
    fn test_format_error_surfaces() {
        let err = ComponentError::from(FormatError::UnknownKeyword("x".to_string()));
        assert!(err.to_string().contains("Unknown keyword"));
    }
}
