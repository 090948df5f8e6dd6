//! Disambiguation helpers bound at the top of every compiled unit

use log::debug;

use crate::component::compiler::CompiledOutput;
use crate::component::config::HelpersConfig;
use crate::component::transforms::{Runnable, TransformError};

/// Prepends `firstMixin = <lookup>;` and `firstComponent = firstMixin;`
#[derive(Debug, Clone)]
pub struct HelperInjection {
    declarations: String,
}

impl HelperInjection {
    pub fn new(helpers: &HelpersConfig) -> Self {
        HelperInjection {
            declarations: format!(
                "{} = {};\n{} = {};\n",
                helpers.first_mixin,
                helpers.first_defined,
                helpers.first_component,
                helpers.first_mixin
            ),
        }
    }

    pub fn declarations(&self) -> &str {
        &self.declarations
    }
}

impl Runnable<CompiledOutput, CompiledOutput> for HelperInjection {
    fn run(&self, mut output: CompiledOutput) -> Result<CompiledOutput, TransformError> {
        debug!("injecting disambiguation helpers");
        output.prepend_code(&self.declarations);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::config::ComponentConfig;

    #[test]
    fn test_helpers_are_prepended() {
        let injection = HelperInjection::new(&ComponentConfig::default().helpers);
        let output = injection
            .run(CompiledOutput::new("echo \"x\";\n".to_string()))
            .unwrap();

        assert_eq!(
            output.code(),
            "firstMixin = component_slots::first_defined;\n\
             firstComponent = firstMixin;\n\
             echo \"x\";\n"
        );
    }
}
