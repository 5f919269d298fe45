//! Spider: in-process test harness for one integration
//!
//! Spider wraps a single integration and invokes its actions and triggers
//! directly with synthetic contexts, without a catalog or a runner. Lookup
//! failures come back as [`Error::NotFound`], distinct from whatever error
//! the unit itself returns.

use serde_json::Value;
use std::sync::Arc;

use crate::context::{AuthContext, ExecutionContext};
use crate::error::Result;
use crate::integration::{Integration, IntegrationMetadata, IntegrationRegistry};
use crate::operation::{Action, Output, Trigger};

/// Step identifier used by contexts built with [`Spider::context_for`]
pub const SPIDER_STEP_ID: &str = "spider";

/// Test harness around one integration
#[derive(Debug)]
pub struct Spider {
    registry: Arc<IntegrationRegistry>,
}

impl Spider {
    /// Wrap an integration
    pub fn new(integration: impl Integration + 'static) -> Self {
        Self {
            registry: Arc::new(IntegrationRegistry::new(integration)),
        }
    }

    /// Wrap an integration that is already registered somewhere
    pub fn from_registry(registry: Arc<IntegrationRegistry>) -> Self {
        Self { registry }
    }

    /// Display metadata, for assertions
    pub fn config(&self) -> &IntegrationMetadata {
        self.registry.metadata()
    }

    /// Underlying registry
    pub fn registry(&self) -> &IntegrationRegistry {
        &self.registry
    }

    /// Actions in display order
    pub fn operations(&self) -> &[Arc<dyn Action>] {
        self.registry.actions()
    }

    /// Triggers in display order
    pub fn triggers(&self) -> &[Arc<dyn Trigger>] {
        self.registry.triggers()
    }

    /// Synthetic context whose current step has `input`
    pub fn context_for(&self, input: Value) -> ExecutionContext {
        ExecutionContext::builder(SPIDER_STEP_ID).input(input).build()
    }

    /// Synthetic context with `input` and credentials
    pub fn context_with_auth(&self, input: Value, auth: AuthContext) -> ExecutionContext {
        ExecutionContext::builder(SPIDER_STEP_ID)
            .input(input)
            .auth(auth)
            .build()
    }

    /// Run the named action
    pub async fn run_operation(&self, name: &str, ctx: &ExecutionContext) -> Result<Output> {
        let action = self.registry.action(name)?;
        action.run(ctx).await
    }

    /// Test-run the named action
    pub async fn test_operation(&self, name: &str, ctx: &ExecutionContext) -> Result<Output> {
        let action = self.registry.action(name)?;
        action.test(ctx).await
    }

    /// Run the named trigger
    pub async fn run_trigger(&self, name: &str, ctx: &ExecutionContext) -> Result<Output> {
        let trigger = self.registry.trigger(name)?;
        trigger.run(ctx).await
    }

    /// Test-run the named trigger
    pub async fn test_trigger(&self, name: &str, ctx: &ExecutionContext) -> Result<Output> {
        let trigger = self.registry.trigger(name)?;
        trigger.test(ctx).await
    }

    /// Invoke the named trigger's enable hook
    pub async fn enable_trigger(&self, name: &str, ctx: &ExecutionContext) -> Result<()> {
        let trigger = self.registry.trigger(name)?;
        trigger.on_enabled(ctx).await
    }

    /// Invoke the named trigger's disable hook
    pub async fn disable_trigger(&self, name: &str, ctx: &ExecutionContext) -> Result<()> {
        let trigger = self.registry.trigger(name)?;
        trigger.on_disabled(ctx).await
    }
}
