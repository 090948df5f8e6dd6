//! Fragment registry and the call-name disambiguation helper

use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

use crate::component::error::RenderError;
use crate::component::script::Stmt;

/// A defined mixin or component body
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub params: Vec<String>,
    pub body: Rc<[Stmt]>,
}

/// Fragments by name. Cloning is cheap; definitions after a clone copy on write.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    fragments: Rc<BTreeMap<String, Fragment>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a fragment
    pub fn define(&mut self, name: impl Into<String>, fragment: Fragment) {
        Rc::make_mut(&mut self.fragments).insert(name.into(), fragment);
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.fragments.keys()
    }
}

/// Returns the first candidate naming a defined fragment.
///
/// Used behind the `firstMixin`/`firstComponent` helpers so a call site can try
/// several names, e.g. `+#{firstComponent("card", "legacy-card")}`.
pub fn first_defined<S: AsRef<str>>(
    registry: &Registry,
    candidates: &[S],
) -> Result<String, RenderError> {
    let found = candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|name| registry.contains(name));
    trace!("first_defined: {:?}", found);
    found
        .map(str::to_string)
        .ok_or_else(|| RenderError::NoCandidateFound {
            candidates: candidates
                .iter()
                .map(|name| name.as_ref().to_string())
                .collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for name in names {
            registry.define(
                *name,
                Fragment {
                    params: vec![],
                    body: Rc::from(Vec::new()),
                },
            );
        }
        registry
    }

    #[test]
    fn test_first_defined_picks_first_match() {
        let registry = registry_with(&["b", "c"]);
        assert_eq!(first_defined(&registry, &["a", "b", "c"]).unwrap(), "b");
    }

    #[test]
    fn test_first_defined_reports_all_candidates() {
        let registry = registry_with(&[]);
        let err = first_defined(&registry, &["x", "y"]).unwrap_err();
        assert_eq!(
            err,
            RenderError::NoCandidateFound {
                candidates: vec!["x".to_string(), "y".to_string()]
            }
        );
    }

    #[test]
    fn test_define_after_clone_does_not_leak() {
        let original = registry_with(&["a"]);
        let mut copy = original.clone();
        copy.define(
            "b",
            Fragment {
                params: vec![],
                body: Rc::from(Vec::new()),
            },
        );
        assert!(!original.contains("b"));
        assert!(copy.contains("a"));
    }
}
