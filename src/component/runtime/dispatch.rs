//! Runtime slot dispatch
//!
//! Every `slot NAME` region in a fragment body is guarded by a call to [`slot`]. The
//! dispatcher looks at the variables visible at that point and handles two situations:
//!
//! - **Deferred**: the fragment has not rendered its caller's content yet. The context
//!   holds the caller's content closure under the children key, so the dispatcher renders
//!   that content with the slot variable set to `NAME`. Any caller region filling `NAME`
//!   signals back through a fill callback. The region's own body (its fallback) renders
//!   only when nothing filled it.
//! - **Direct**: the dispatcher is running inside caller content that was invoked by an
//!   outer dispatch. If the active slot variable equals `NAME`, it fires the matching fill
//!   callback and lets the region render.

use std::cell::Cell;
use std::rc::Rc;

use log::trace;

use super::value::{Callback, Context, Value};
use crate::component::config::{ComponentConfig, SlotsConfig};

/// Context keys the dispatcher reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotKeys {
    pub variable: String,
    pub default_name: String,
    pub children_variable: String,
}

impl SlotKeys {
    pub fn from_config(config: &SlotsConfig) -> Self {
        SlotKeys {
            variable: config.variable.clone(),
            default_name: config.default_name.clone(),
            children_variable: config.children_variable.clone(),
        }
    }

    pub fn fill_key(&self, slot: &str) -> String {
        format!("{}_{}", self.variable, slot)
    }

    /// True for the slot variable and every fill key
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.variable
            || key
                .strip_prefix(self.variable.as_str())
                .map_or(false, |rest| rest.starts_with('_'))
    }
}

impl Default for SlotKeys {
    fn default() -> Self {
        SlotKeys::from_config(&ComponentConfig::default().slots)
    }
}

/// Records whether a slot got filled during one deferred dispatch
#[derive(Debug, Clone, Default)]
pub struct FillFlag(Rc<Cell<bool>>);

impl FillFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> Callback {
        let flag = Rc::clone(&self.0);
        Callback::new(move || flag.set(true))
    }

    pub fn is_filled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlotDispatcher {
    keys: SlotKeys,
}

impl SlotDispatcher {
    pub fn new(keys: SlotKeys) -> Self {
        SlotDispatcher { keys }
    }

    /// Decides whether the region guarded by `slot NAME` renders its own body.
    ///
    /// An empty `name` stands for the default slot. Only a [`Value::Children`] under the
    /// children key counts as caller content: it is the one callable that accepts the
    /// augmented context. Any other value there is ignored and the direct case applies.
    pub fn dispatch(&self, name: &str, context: &Context) -> bool {
        let name = if name.is_empty() {
            self.keys.default_name.as_str()
        } else {
            name
        };

        let active = self.is_active(name, context);

        if let Some(Value::Children(children)) = context.get(&self.keys.children_variable) {
            let flag = FillFlag::new();
            let mut inner = context.clone();
            inner.insert(self.keys.variable.clone(), name);
            inner.insert(self.keys.fill_key(name), flag.callback());
            trace!("slot '{}': rendering caller content", name);
            children.call(inner);
            let filled = flag.is_filled();
            trace!("slot '{}': filled={}", name, filled);
            // A forwarding region fills the enclosing request with either the forwarded
            // content or its own body.
            if active {
                self.signal_fill(name, context);
            }
            return !filled;
        }

        if active {
            self.signal_fill(name, context);
            trace!("slot '{}': active, rendering", name);
        }
        active
    }

    fn is_active(&self, name: &str, context: &Context) -> bool {
        matches!(context.get(&self.keys.variable), Some(Value::Str(active)) if active == name)
    }

    fn signal_fill(&self, name: &str, context: &Context) {
        if let Some(Value::Callback(fill)) = context.get(&self.keys.fill_key(name)) {
            fill.call();
        }
    }
}

/// Dispatches with the default key names
pub fn slot(name: &str, context: &Context) -> bool {
    SlotDispatcher::default().dispatch(name, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::runtime::value::ChildrenFn;
    use std::cell::RefCell;

    #[test]
    fn test_inactive_slot_does_not_render() {
        assert!(!slot("foo", &Context::new()));
        let context = Context::new().with("component_slot", "bar");
        assert!(!slot("foo", &context));
    }

    #[test]
    fn test_active_slot_renders_and_signals_fill() {
        let flag = FillFlag::new();
        let context = Context::new()
            .with("component_slot", "foo")
            .with("component_slot_foo", flag.callback());
        assert!(slot("foo", &context));
        assert!(flag.is_filled());
    }

    #[test]
    fn test_active_slot_without_callback_still_renders() {
        let context = Context::new().with("component_slot", "foo");
        assert!(slot("foo", &context));
    }

    #[test]
    fn test_empty_name_means_default_slot() {
        let context = Context::new().with("component_slot", "__main__");
        assert!(slot("", &context));
    }

    #[test]
    fn test_deferred_fallback_when_caller_does_not_fill() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&seen);
        let children = ChildrenFn::new(move |context: Context| {
            recorder
                .borrow_mut()
                .push(context.get("component_slot").cloned());
        });
        let context = Context::new().with("__children", children);

        assert!(slot("foo", &context));
        assert_eq!(*seen.borrow(), vec![Some(Value::str("foo"))]);
    }

    #[test]
    fn test_deferred_caller_fill_suppresses_fallback() {
        let children = ChildrenFn::new(|mut context: Context| {
            context.remove("__children");
            assert!(slot("foo", &context));
        });
        let context = Context::new().with("__children", children);
        assert!(!slot("foo", &context));
    }

    #[test]
    fn test_deferred_fill_of_other_slot_keeps_fallback() {
        let children = ChildrenFn::new(|mut context: Context| {
            context.remove("__children");
            assert!(!slot("bar", &context));
        });
        let context = Context::new().with("__children", children);
        assert!(slot("foo", &context));
    }

    #[test]
    fn test_forwarding_region_signals_enclosing_fill() {
        // rendering the inner fragment's title request from inside outer caller content
        let outer = ChildrenFn::new(|_: Context| {});
        let flag = FillFlag::new();
        let context = Context::new()
            .with("__children", outer)
            .with("component_slot", "title")
            .with("component_slot_title", flag.callback());

        assert!(slot("title", &context));
        assert!(flag.is_filled());
    }

    #[test]
    fn test_forwarded_fill_also_signals_enclosing_request() {
        let outer = ChildrenFn::new(|mut context: Context| {
            context.remove("__children");
            assert!(slot("title", &context));
        });
        let flag = FillFlag::new();
        let context = Context::new()
            .with("__children", outer)
            .with("component_slot", "title")
            .with("component_slot_title", flag.callback());

        assert!(!slot("title", &context));
        assert!(flag.is_filled());
    }

    #[test]
    fn test_forwarding_other_slot_does_not_signal() {
        let outer = ChildrenFn::new(|_: Context| {});
        let flag = FillFlag::new();
        let context = Context::new()
            .with("__children", outer)
            .with("component_slot", "title")
            .with("component_slot_title", flag.callback());

        assert!(slot("footer", &context));
        assert!(!flag.is_filled());
    }

    #[test]
    fn test_reserved_keys() {
        let keys = SlotKeys::default();
        assert!(keys.is_reserved("component_slot"));
        assert!(keys.is_reserved("component_slot_title"));
        assert!(!keys.is_reserved("component_slots"));
        assert!(!keys.is_reserved("title"));
    }
}
