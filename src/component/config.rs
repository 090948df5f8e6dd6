//! Configuration for component slots
//!
//! `defaults/component.default.toml` is embedded into the crate so that the documented
//! defaults and [`ComponentConfig::default`] stay in sync. Callers layer their own files
//! and overrides on top through [`Loader`] before deserializing into [`ComponentConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/component.default.toml");

/// Top-level configuration consumed by the compiler and its extensions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentConfig {
    pub slots: SlotsConfig,
    pub syntax: SyntaxConfig,
    pub helpers: HelpersConfig,
}

/// Names shared by generated slot guards and the runtime dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotsConfig {
    pub variable: String,
    pub default_name: String,
    pub children_variable: String,
    pub dispatcher: String,
    pub keyword: String,
}

impl SlotsConfig {
    /// Context key of the fill callback for one slot
    pub fn fill_key(&self, slot: &str) -> String {
        format!("{}_{}", self.variable, slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyntaxConfig {
    pub call_prefixes: Vec<char>,
    pub mixin_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelpersConfig {
    pub first_mixin: String,
    pub first_component: String,
    pub first_defined: String,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        ComponentConfig {
            slots: SlotsConfig {
                variable: "component_slot".to_string(),
                default_name: "__main__".to_string(),
                children_variable: "__children".to_string(),
                dispatcher: "component_slots::slot".to_string(),
                keyword: "slot".to_string(),
            },
            syntax: SyntaxConfig {
                call_prefixes: vec!['+', '@'],
                mixin_keywords: vec!["mixin".to_string(), "component".to_string()],
            },
            helpers: HelpersConfig {
                first_mixin: "firstMixin".to_string(),
                first_component: "firstComponent".to_string(),
                first_defined: "component_slots::first_defined".to_string(),
            },
        }
    }
}

/// Layers TOML files and key overrides on top of the embedded defaults
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the embedded defaults
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Adds a TOML file that must exist
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Adds a TOML file, skipped when absent
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, e.g. a section embedded in a larger document.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ComponentConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults, deserialized
pub fn load_defaults() -> Result<ComponentConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, ComponentConfig::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("slots.variable", "active_slot")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.slots.variable, "active_slot");
        assert_eq!(config.slots.fill_key("title"), "active_slot_title");
    }

    #[test]
    fn layers_toml_text() {
        let config = Loader::new()
            .with_toml("[helpers]\nfirst_mixin = \"pickMixin\"\n")
            .build()
            .expect("config to build");
        assert_eq!(config.helpers.first_mixin, "pickMixin");
        assert_eq!(config.helpers.first_component, "firstComponent");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does/not/exist.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.syntax.call_prefixes, vec!['+', '@']);
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new().with_file("does/not/exist.toml").build().is_err());
    }
}
