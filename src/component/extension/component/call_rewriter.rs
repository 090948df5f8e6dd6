//! Slot-aware restructuring of fragment calls
//!
//! Runs on `after-parse-node`. For a call node with children `[c1, .., cn]` the result
//! is `[reset, g(c1), .., g(cn)]` where `reset` clears the active slot for this
//! invocation and `g` wraps a child in a guard that only lets it render for the default
//! region:
//!
//! ```text
//! Code (opaque)
//!   Text   <slot unset or default>
//!   Code   <fill callback of the default slot, if any> (opaque)
//!   <original child>
//! ```
//!
//! The marker statement signals the default slot's fill callback, so a `slot` region
//! for the default slot drops its fallback once bare content rendered into it.
//!
//! Slot declarations are left in place since they carry their own guard, and opaque
//! children were generated by an earlier pass so they are never wrapped again.

use log::debug;

use crate::component::ast::Node;
use crate::component::config::SlotsConfig;
use crate::component::runtime::dispatch::SlotKeys;
use crate::component::script::quote;
use crate::component::transforms::{Runnable, TransformError};

#[derive(Debug, Clone)]
pub struct CallRewriter {
    slot_keyword: String,
    reset: String,
    condition: String,
    marker: String,
}

impl CallRewriter {
    pub fn new(slots: &SlotsConfig) -> Self {
        let variable = &slots.variable;
        CallRewriter {
            slot_keyword: slots.keyword.clone(),
            reset: format!("{} = null", variable),
            condition: format!(
                "{variable} == null || {variable} == {}",
                quote(&slots.default_name)
            ),
            marker: format!(
                "{fill} && {fill}()",
                fill = SlotKeys::from_config(slots).fill_key(&slots.default_name)
            ),
        }
    }

    /// The statement clearing the active slot
    pub fn reset_statement(&self) -> &str {
        &self.reset
    }

    /// The guard condition source
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// The statement a guard runs before its child
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn rewrite(&self, mut call: Node) -> Node {
        if !call.is_call() || self.is_rewritten(&call) {
            return call;
        }

        let original = call.take_children();
        let original_count = original.len();
        let mut children = Vec::with_capacity(original_count + 1);
        children.push(Node::opaque_code(Some(self.reset.clone()), call.position));

        let mut guarded = 0;
        for child in original {
            if child.is_keyword(&self.slot_keyword) || child.is_opaque() {
                children.push(child);
            } else {
                children.push(self.guard(child));
                guarded += 1;
            }
        }

        debug!(
            "rewrote call {} at {:?}: {} children, {} guarded",
            crate::component::ast::AstNode::display_label(&call),
            call.position,
            original_count,
            guarded
        );
        call.set_children(children);
        call
    }

    fn is_rewritten(&self, call: &Node) -> bool {
        call.child_at(0)
            .map(|first| first.is_opaque() && first.value() == Some(self.reset.as_str()))
            .unwrap_or(false)
    }

    fn guard(&self, node: Node) -> Node {
        let position = node.position;
        Node::opaque_code(None, position)
            .with_child(Node::text(self.condition.clone(), position))
            .with_child(Node::opaque_code(Some(self.marker.clone()), position))
            .with_child(node)
    }
}

impl Runnable<Node, Node> for CallRewriter {
    fn run(&self, node: Node) -> Result<Node, TransformError> {
        Ok(self.rewrite(node))
    }
}
