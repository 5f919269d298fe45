//! Manual trigger integration

use async_trait::async_trait;
use std::sync::Arc;
use tether_core::{
    ExecutionContext, Integration, IntegrationMetadata, OperationInfo, Output, Result, Trigger,
};

const DESCRIPTOR: &str = include_str!("integration.yaml");
const DOCUMENTATION: &str = include_str!("README.md");

/// Integration that starts workflows by hand
pub struct ManualIntegration {
    metadata: IntegrationMetadata,
    trigger: Arc<ManualTrigger>,
}

impl ManualIntegration {
    /// Parse the bundled descriptor and build the trigger
    pub fn new() -> Result<Self> {
        Ok(Self {
            metadata: IntegrationMetadata::from_descriptor(DESCRIPTOR, DOCUMENTATION)?,
            trigger: Arc::new(ManualTrigger::new()),
        })
    }
}

impl Integration for ManualIntegration {
    fn id(&self) -> &str {
        "manual"
    }

    fn metadata(&self) -> &IntegrationMetadata {
        &self.metadata
    }

    fn triggers(&self) -> Vec<Arc<dyn Trigger>> {
        vec![self.trigger.clone() as Arc<dyn Trigger>]
    }
}

/// Fires with an empty payload
pub struct ManualTrigger {
    info: OperationInfo,
}

impl ManualTrigger {
    fn new() -> Self {
        Self {
            info: OperationInfo::new("Manual trigger", "Start the workflow by hand"),
        }
    }
}

#[async_trait]
impl Trigger for ManualTrigger {
    fn id(&self) -> &str {
        "trigger"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        tracing::debug!(step = ctx.current_step_id(), "manual trigger fired");
        Ok(Output::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::Spider;

    #[tokio::test]
    async fn test_manual_trigger_returns_empty_output() {
        let spider = Spider::new(ManualIntegration::new().unwrap());
        assert_eq!(spider.triggers().len(), 1);
        assert!(spider.operations().is_empty());
        assert_eq!(spider.triggers()[0].id(), "trigger");

        let ctx = spider.context_for(json!({}));
        let output = spider.run_trigger("trigger", &ctx).await.unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_enable_disable_are_idempotent() {
        let spider = Spider::new(ManualIntegration::new().unwrap());
        let ctx = spider.context_for(json!({}));
        spider.enable_trigger("trigger", &ctx).await.unwrap();
        spider.enable_trigger("trigger", &ctx).await.unwrap();
        spider.disable_trigger("trigger", &ctx).await.unwrap();
        spider.disable_trigger("trigger", &ctx).await.unwrap();
    }
}
