//! Codegen for `slot [name]`

use crate::component::ast::Node;
use crate::component::config::SlotsConfig;
use crate::component::error::FormatError;
use crate::component::extension::{KeywordCodegen, KeywordOutput};
use crate::component::script::quote;

/// Wraps a slot's content in a call to the dispatcher. The dispatcher path is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct SlotKeyword {
    dispatcher: String,
    default_name: String,
}

impl SlotKeyword {
    pub fn new(slots: &SlotsConfig) -> Self {
        SlotKeyword {
            dispatcher: slots.dispatcher.clone(),
            default_name: slots.default_name.clone(),
        }
    }

    pub fn boundaries(&self, name: &str) -> KeywordOutput {
        let name = match name.trim() {
            "" => self.default_name.as_str(),
            name => name,
        };
        KeywordOutput {
            begin: format!("if {}({}, defined_vars()) {{", self.dispatcher, quote(name)),
            end: "}".to_string(),
        }
    }
}

impl KeywordCodegen for SlotKeyword {
    fn generate(&self, value: &str, _node: &Node) -> Result<KeywordOutput, FormatError> {
        Ok(self.boundaries(value))
    }
}
