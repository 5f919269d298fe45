//! Script integration

mod regex_extract;
mod template;

use std::sync::Arc;
use tether_core::{Action, Integration, IntegrationMetadata, Result};

pub use regex_extract::RegexExtract;
pub use template::Template;

const DESCRIPTOR: &str = include_str!("integration.yaml");
const DOCUMENTATION: &str = include_str!("README.md");

/// Integration for embedded scripts
pub struct ScriptIntegration {
    metadata: IntegrationMetadata,
    template: Arc<Template>,
    regex_extract: Arc<RegexExtract>,
}

impl ScriptIntegration {
    /// Parse the bundled descriptor and build the actions
    pub fn new() -> Result<Self> {
        Ok(Self {
            metadata: IntegrationMetadata::from_descriptor(DESCRIPTOR, DOCUMENTATION)?,
            template: Arc::new(Template::new()),
            regex_extract: Arc::new(RegexExtract::new()),
        })
    }
}

impl Integration for ScriptIntegration {
    fn id(&self) -> &str {
        "script"
    }

    fn metadata(&self) -> &IntegrationMetadata {
        &self.metadata
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        vec![
            self.template.clone() as Arc<dyn Action>,
            self.regex_extract.clone() as Arc<dyn Action>,
        ]
    }
}
