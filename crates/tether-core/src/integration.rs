//! Integrations and their per-integration registries
//!
//! An integration bundles the actions and triggers for one third-party
//! service or feature area. Its display metadata comes from a bundled YAML
//! descriptor plus a Markdown document:
//!
//! ```yaml
//! name: CSV
//! description: Inspect and convert CSV documents
//! version: "0.1.0"
//! category: data
//! icon: https://example.com/csv.svg
//! authors:
//!   - Tether Contributors
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::operation::{Action, Trigger, Unit};

/// Display metadata of an integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationMetadata {
    /// Display name
    #[serde(rename = "name")]
    pub display_name: String,

    /// Short description
    pub description: String,

    /// Integration version
    pub version: String,

    /// Catalog category
    pub category: String,

    /// Logo URL or icon name
    #[serde(rename = "icon", default)]
    pub logo: String,

    /// Author list
    #[serde(default)]
    pub authors: Vec<String>,

    /// Long-form Markdown documentation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,
}

impl IntegrationMetadata {
    /// Parse a bundled YAML descriptor and attach its documentation
    pub fn from_descriptor(descriptor: &str, documentation: &str) -> Result<Self> {
        let mut metadata: Self = serde_yaml::from_str(descriptor)?;
        if metadata.display_name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "integration descriptor has an empty name".to_string(),
            });
        }
        metadata.documentation = documentation.to_string();
        Ok(metadata)
    }
}

/// Credential shape an integration expects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    /// No credentials
    #[default]
    None,
    /// Static API key in `access_token`
    ApiKey,
    /// Bearer token in `access_token`
    Bearer,
    /// Username and password
    Basic,
    /// OAuth2 token object
    Oauth2,
    /// Integration-specific fields
    Custom,
}

/// Whether and how an integration authenticates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequirement {
    /// Whether credentials must be resolved before invocation
    pub required: bool,

    /// Credential shape
    pub kind: AuthKind,
}

impl AuthRequirement {
    /// No credentials needed
    pub fn none() -> Self {
        Self::default()
    }

    /// Credentials of `kind` are required
    pub fn required(kind: AuthKind) -> Self {
        Self {
            required: true,
            kind,
        }
    }
}

/// A bundle of related actions and triggers
///
/// Implementations build their units once, at construction.
pub trait Integration: Send + Sync {
    /// Identifier, unique within a catalog
    fn id(&self) -> &str;

    /// Display metadata
    fn metadata(&self) -> &IntegrationMetadata;

    /// Authentication requirement
    fn auth(&self) -> AuthRequirement {
        AuthRequirement::none()
    }

    /// Triggers, in display order
    fn triggers(&self) -> Vec<Arc<dyn Trigger>> {
        Vec::new()
    }

    /// Actions, in display order
    fn actions(&self) -> Vec<Arc<dyn Action>> {
        Vec::new()
    }
}

/// An integration together with its flat identifier lookup
pub struct IntegrationRegistry {
    integration: Arc<dyn Integration>,
    actions: Vec<Arc<dyn Action>>,
    triggers: Vec<Arc<dyn Trigger>>,
    units: HashMap<String, Unit>,
}

impl IntegrationRegistry {
    /// Build the lookup table for `integration`
    ///
    /// Identifiers share one namespace; when two units use the same
    /// identifier the later one wins (triggers are inserted after actions).
    pub fn new(integration: impl Integration + 'static) -> Self {
        Self::from_arc(Arc::new(integration))
    }

    /// Build the lookup table for an already shared integration
    pub fn from_arc(integration: Arc<dyn Integration>) -> Self {
        let actions = integration.actions();
        let triggers = integration.triggers();

        let mut units = HashMap::with_capacity(actions.len() + triggers.len());
        let all = actions
            .iter()
            .map(|a| Unit::Action(a.clone()))
            .chain(triggers.iter().map(|t| Unit::Trigger(t.clone())));
        for unit in all {
            let id = unit.id().to_string();
            if let Some(previous) = units.insert(id.clone(), unit) {
                tracing::warn!(
                    integration = integration.id(),
                    operation = %id,
                    replaced = ?previous,
                    "duplicate operation identifier, last registration wins"
                );
            }
        }

        Self {
            integration,
            actions,
            triggers,
            units,
        }
    }

    /// Integration identifier
    pub fn id(&self) -> &str {
        self.integration.id()
    }

    /// Display metadata
    pub fn metadata(&self) -> &IntegrationMetadata {
        self.integration.metadata()
    }

    /// Authentication requirement
    pub fn auth(&self) -> AuthRequirement {
        self.integration.auth()
    }

    /// Whether credentials are required
    pub fn requires_auth(&self) -> bool {
        self.auth().required
    }

    /// Actions, in display order
    pub fn actions(&self) -> &[Arc<dyn Action>] {
        &self.actions
    }

    /// Triggers, in display order
    pub fn triggers(&self) -> &[Arc<dyn Trigger>] {
        &self.triggers
    }

    /// Number of distinct resolvable identifiers
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Resolve any unit by identifier
    pub fn resolve(&self, id: &str) -> Result<&Unit> {
        self.units
            .get(id)
            .ok_or_else(|| Error::not_found("operation", format!("{}.{}", self.id(), id)))
    }

    /// Resolve an action by identifier
    pub fn action(&self, id: &str) -> Result<Arc<dyn Action>> {
        match self.units.get(id) {
            Some(Unit::Action(action)) => Ok(action.clone()),
            _ => Err(Error::not_found("action", format!("{}.{}", self.id(), id))),
        }
    }

    /// Resolve a trigger by identifier
    pub fn trigger(&self, id: &str) -> Result<Arc<dyn Trigger>> {
        match self.units.get(id) {
            Some(Unit::Trigger(trigger)) => Ok(trigger.clone()),
            _ => Err(Error::not_found("trigger", format!("{}.{}", self.id(), id))),
        }
    }

    /// Static checks over the integration's descriptors
    ///
    /// Returns one message per problem found; an empty list means the
    /// integration is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let declared = self.actions.len() + self.triggers.len();
        if declared != self.units.len() {
            problems.push(format!(
                "{}: {} units declared but only {} distinct identifiers",
                self.id(),
                declared,
                self.units.len()
            ));
        }
        for unit in self.units.values() {
            let info = unit.info();
            if !info.sample_output.is_object() {
                problems.push(format!(
                    "{}.{}: sample output is not a JSON object",
                    self.id(),
                    unit.id()
                ));
            }
            if info.requires_auth && !self.requires_auth() {
                problems.push(format!(
                    "{}.{}: operation requires auth but the integration declares none",
                    self.id(),
                    unit.id()
                ));
            }
            for (name, field) in info.input_schema.iter() {
                if field.required && field.default.is_some() {
                    problems.push(format!(
                        "{}.{}: required field '{}' also declares a default",
                        self.id(),
                        unit.id(),
                        name
                    ));
                }
            }
        }
        problems.sort();
        problems
    }
}

impl std::fmt::Debug for IntegrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationRegistry")
            .field("id", &self.id())
            .field("actions", &self.actions.len())
            .field("triggers", &self.triggers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExecutionContext;
    use crate::operation::Output;
    use crate::schema::{FieldDescriptor, InputSchema, OperationInfo};
    use async_trait::async_trait;
    use serde_json::json;

    const DESCRIPTOR: &str = r#"
name: Demo
description: Demo integration
version: "1.2.3"
category: testing
icon: demo.svg
authors:
  - Ada
  - Grace
"#;

    struct Noop {
        id: &'static str,
        info: OperationInfo,
    }

    impl Noop {
        fn new(id: &'static str) -> Arc<Self> {
            Self::with_info(id, OperationInfo::new(id, "does nothing"))
        }

        fn with_info(id: &'static str, info: OperationInfo) -> Arc<Self> {
            Arc::new(Self { id, info })
        }
    }

    #[async_trait]
    impl Action for Noop {
        fn id(&self) -> &str {
            self.id
        }
        fn info(&self) -> &OperationInfo {
            &self.info
        }
        async fn run(&self, _ctx: &ExecutionContext) -> Result<Output> {
            Ok(Output::new())
        }
    }

    #[async_trait]
    impl Trigger for Noop {
        fn id(&self) -> &str {
            self.id
        }
        fn info(&self) -> &OperationInfo {
            &self.info
        }
        async fn run(&self, _ctx: &ExecutionContext) -> Result<Output> {
            Ok(Output::new())
        }
    }

    struct Demo {
        metadata: IntegrationMetadata,
        actions: Vec<&'static str>,
        triggers: Vec<&'static str>,
    }

    impl Demo {
        fn new(actions: Vec<&'static str>, triggers: Vec<&'static str>) -> Self {
            Self {
                metadata: IntegrationMetadata::from_descriptor(DESCRIPTOR, "# Demo").unwrap(),
                actions,
                triggers,
            }
        }
    }

    impl Integration for Demo {
        fn id(&self) -> &str {
            "demo"
        }
        fn metadata(&self) -> &IntegrationMetadata {
            &self.metadata
        }
        fn actions(&self) -> Vec<Arc<dyn Action>> {
            self.actions
                .iter()
                .map(|id| Noop::new(*id) as Arc<dyn Action>)
                .collect()
        }
        fn triggers(&self) -> Vec<Arc<dyn Trigger>> {
            self.triggers
                .iter()
                .map(|id| Noop::new(*id) as Arc<dyn Trigger>)
                .collect()
        }
    }

    /// Integration with a single action built from a caller-supplied descriptor
    struct Single {
        metadata: IntegrationMetadata,
        action: Arc<Noop>,
        auth: AuthRequirement,
    }

    impl Single {
        fn new(info: OperationInfo, auth: AuthRequirement) -> Self {
            Self {
                metadata: IntegrationMetadata::from_descriptor(DESCRIPTOR, "").unwrap(),
                action: Noop::with_info("broken", info),
                auth,
            }
        }
    }

    impl Integration for Single {
        fn id(&self) -> &str {
            "single"
        }
        fn metadata(&self) -> &IntegrationMetadata {
            &self.metadata
        }
        fn auth(&self) -> AuthRequirement {
            self.auth.clone()
        }
        fn actions(&self) -> Vec<Arc<dyn Action>> {
            vec![self.action.clone() as Arc<dyn Action>]
        }
    }

    fn problems_for(info: OperationInfo, auth: AuthRequirement) -> Vec<String> {
        IntegrationRegistry::new(Single::new(info, auth)).validate()
    }

    #[test]
    fn test_metadata_from_descriptor() {
        let metadata = IntegrationMetadata::from_descriptor(DESCRIPTOR, "# Demo").unwrap();
        assert_eq!(metadata.display_name, "Demo");
        assert_eq!(metadata.version, "1.2.3");
        assert_eq!(metadata.logo, "demo.svg");
        assert_eq!(metadata.authors, vec!["Ada", "Grace"]);
        assert_eq!(metadata.documentation, "# Demo");
    }

    #[test]
    fn test_metadata_rejects_empty_name() {
        let yaml = "name: ''\ndescription: x\nversion: '1'\ncategory: c\n";
        assert!(IntegrationMetadata::from_descriptor(yaml, "").is_err());
    }

    #[test]
    fn test_metadata_rejects_malformed_yaml() {
        let err = IntegrationMetadata::from_descriptor("name: [", "").unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
    }

    #[test]
    fn test_registry_resolves_by_kind() {
        let registry = IntegrationRegistry::new(Demo::new(vec!["a", "b"], vec!["t"]));
        assert_eq!(registry.unit_count(), 3);
        assert!(registry.action("a").is_ok());
        assert!(registry.trigger("t").is_ok());
        assert!(registry.action("t").is_err());
        assert!(registry.trigger("a").is_err());
        assert!(registry.resolve("t").unwrap().is_trigger());
        assert!(registry.validate().is_empty());
    }

    #[test]
    fn test_registry_lookup_error_names_operation() {
        let registry = IntegrationRegistry::new(Demo::new(vec!["a"], vec![]));
        let err = registry.resolve("zzz").unwrap_err();
        assert_eq!(err.to_string(), "operation not found: demo.zzz");
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let registry = IntegrationRegistry::new(Demo::new(vec!["x"], vec!["x"]));
        assert_eq!(registry.unit_count(), 1);
        assert!(registry.resolve("x").unwrap().is_trigger());
        let problems = registry.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("distinct identifiers"));
    }

    #[test]
    fn test_validate_flags_non_object_sample_output() {
        let info = OperationInfo::new("Broken", "").with_sample_output(json!([1, 2]));
        assert_eq!(
            problems_for(info, AuthRequirement::none()),
            vec!["single.broken: sample output is not a JSON object"]
        );
    }

    #[test]
    fn test_validate_flags_auth_without_integration_auth() {
        let info = OperationInfo::new("Broken", "").requires_auth();
        assert_eq!(
            problems_for(info.clone(), AuthRequirement::none()),
            vec!["single.broken: operation requires auth but the integration declares none"]
        );
        assert!(problems_for(info, AuthRequirement::required(AuthKind::ApiKey)).is_empty());
    }

    #[test]
    fn test_validate_flags_required_field_with_default() {
        let info = OperationInfo::new("Broken", "").with_input(
            InputSchema::new()
                .field("mode", FieldDescriptor::short_text("Mode").required().with_default("a"))
                .field("name", FieldDescriptor::short_text("Name").required()),
        );
        assert_eq!(
            problems_for(info, AuthRequirement::none()),
            vec!["single.broken: required field 'mode' also declares a default"]
        );
    }

    #[test]
    fn test_validate_reports_every_problem_sorted() {
        let info = OperationInfo::new("Broken", "")
            .with_sample_output(json!("nope"))
            .with_input(
                InputSchema::new()
                    .field("x", FieldDescriptor::boolean("X").required().with_default(true)),
            )
            .requires_auth();
        let problems = problems_for(info, AuthRequirement::none());
        assert_eq!(problems.len(), 3);
        let mut sorted = problems.clone();
        sorted.sort();
        assert_eq!(problems, sorted);
    }
}
