//! Components with named slots
//!
//! [`ComponentExtension`] wires four pieces into a compiler:
//!
//! - [`ComponentScanner`] recognizes `+name`, `@name`, and `+#{expr}` calls.
//! - [`CallRewriter`] guards a call's bare content so it only renders for the default
//!   slot, and resets the active slot at the start of every call.
//! - [`SlotKeyword`] turns `slot [name]` into a dispatcher check.
//! - [`HelperInjection`] binds `firstMixin` and `firstComponent` in the output.
//!
//! The render-time half lives in [`crate::component::runtime::dispatch`].

pub mod call_rewriter;
pub mod helpers;
pub mod scanner;
pub mod slot_keyword;

pub use call_rewriter::CallRewriter;
pub use helpers::HelperInjection;
pub use scanner::ComponentScanner;
pub use slot_keyword::SlotKeyword;

use super::{Extension, KeywordCodegen};
use crate::component::config::ComponentConfig;
use crate::component::lexer::Scanner;
use crate::component::transforms::Pipeline;

#[derive(Debug, Clone)]
pub struct ComponentExtension {
    config: ComponentConfig,
}

impl ComponentExtension {
    pub fn new(config: ComponentConfig) -> Self {
        ComponentExtension { config }
    }
}

impl Default for ComponentExtension {
    fn default() -> Self {
        Self::new(ComponentConfig::default())
    }
}

impl Extension for ComponentExtension {
    fn name(&self) -> &'static str {
        "component"
    }

    fn scanners(&self) -> Vec<Box<dyn Scanner>> {
        vec![Box::new(ComponentScanner::new(
            self.config.syntax.call_prefixes.clone(),
        ))]
    }

    fn keywords(&self) -> Vec<(String, Box<dyn KeywordCodegen>)> {
        vec![(
            self.config.slots.keyword.clone(),
            Box::new(SlotKeyword::new(&self.config.slots)),
        )]
    }

    fn install(&self, pipeline: &mut Pipeline) {
        pipeline
            .after_parse_node
            .register("component-call-rewriter", CallRewriter::new(&self.config.slots));
        pipeline
            .before_emit_output
            .register("component-helpers", HelperInjection::new(&self.config.helpers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_registers_both_stages() {
        let mut pipeline = Pipeline::new();
        ComponentExtension::default().install(&mut pipeline);

        assert_eq!(pipeline.after_parse_node.stages(), ["component-call-rewriter"]);
        assert_eq!(pipeline.before_emit_output.stages(), ["component-helpers"]);
    }

    #[test]
    fn test_contributes_slot_keyword_and_scanner() {
        let extension = ComponentExtension::default();
        let keywords: Vec<String> = extension.keywords().into_iter().map(|(name, _)| name).collect();

        assert_eq!(keywords, vec!["slot".to_string()]);
        assert_eq!(extension.scanners()[0].name(), "component-call");
    }
}
