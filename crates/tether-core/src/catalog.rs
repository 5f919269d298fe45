//! Process catalog of integrations
//!
//! The catalog is an explicit object built by the process entry point. It is
//! mutated only while integrations are registered during initialization and
//! is then shared read-only, typically behind an `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::integration::{Integration, IntegrationRegistry};
use crate::operation::{Action, Trigger, Unit};

/// Receipt for one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationHandle {
    /// Identifier the integration was stored under
    pub integration_id: String,
    /// Number of registered actions
    pub actions: usize,
    /// Number of registered triggers
    pub triggers: usize,
    /// Whether an earlier registration under the same identifier was replaced
    pub replaced: bool,
}

/// Catalog keyed by integration identifier
#[derive(Debug, Default)]
pub struct Catalog {
    integrations: BTreeMap<String, Arc<IntegrationRegistry>>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an integration
    ///
    /// Registering an identifier that is already present replaces the
    /// earlier entry.
    pub fn register(&mut self, integration: impl Integration + 'static) -> RegistrationHandle {
        self.register_registry(IntegrationRegistry::new(integration))
    }

    /// Register a prebuilt integration registry
    pub fn register_registry(&mut self, registry: IntegrationRegistry) -> RegistrationHandle {
        let integration_id = registry.id().to_string();
        let actions = registry.actions().len();
        let triggers = registry.triggers().len();

        let replaced = self
            .integrations
            .insert(integration_id.clone(), Arc::new(registry))
            .is_some();

        if replaced {
            tracing::warn!(
                integration = %integration_id,
                "integration registered twice, replacing earlier registration"
            );
        } else {
            tracing::info!(
                integration = %integration_id,
                actions,
                triggers,
                "registered integration"
            );
        }

        RegistrationHandle {
            integration_id,
            actions,
            triggers,
            replaced,
        }
    }

    /// Keep only the listed integrations; an empty list keeps everything
    pub fn retain_only(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        for id in ids {
            if !self.integrations.contains_key(id) {
                tracing::warn!(integration = %id, "allow-listed integration is not registered");
            }
        }
        self.integrations.retain(|id, _| ids.contains(id));
    }

    /// Look up an integration
    pub fn integration(&self, id: &str) -> Result<Arc<IntegrationRegistry>> {
        self.integrations
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("integration", id))
    }

    /// Resolve any unit of an integration
    pub fn resolve(&self, integration: &str, operation: &str) -> Result<Unit> {
        self.integration(integration)?.resolve(operation).cloned()
    }

    /// Resolve an action
    pub fn action(&self, integration: &str, operation: &str) -> Result<Arc<dyn Action>> {
        self.integration(integration)?.action(operation)
    }

    /// Resolve a trigger
    pub fn trigger(&self, integration: &str, operation: &str) -> Result<Arc<dyn Trigger>> {
        self.integration(integration)?.trigger(operation)
    }

    /// Registered integrations in identifier order
    pub fn integrations(&self) -> impl Iterator<Item = &Arc<IntegrationRegistry>> {
        self.integrations.values()
    }

    /// Number of registered integrations
    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    /// Static checks over every registered integration
    pub fn validate(&self) -> Vec<String> {
        self.integrations()
            .flat_map(|registry| registry.validate())
            .collect()
    }
}
