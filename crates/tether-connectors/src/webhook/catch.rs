//! Inbound webhook trigger

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use tether_core::{Error, ExecutionContext, OperationInfo, Output, Result, Trigger, to_output};
use tokio::sync::Mutex;

/// Starts a run with the payload received by the platform
///
/// Tracks which trigger steps are enabled so that repeated enable or
/// disable calls are no-ops.
pub struct Catch {
    info: OperationInfo,
    enabled: Mutex<HashSet<String>>,
}

impl Catch {
    pub(super) fn new() -> Self {
        Self {
            info: OperationInfo::new("Catch webhook", "Start a run from an inbound request")
                .with_sample_output(json!({"event": "order.created", "id": 42})),
            enabled: Mutex::new(HashSet::new()),
        }
    }

    /// Whether the trigger step `step_id` is currently enabled
    pub async fn is_enabled(&self, step_id: &str) -> bool {
        self.enabled.lock().await.contains(step_id)
    }
}

#[async_trait]
impl Trigger for Catch {
    fn id(&self) -> &str {
        "catch"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let payload = ctx.current_input()?;
        if !payload.is_object() {
            return Err(Error::binding(self.id(), "webhook payload is not a JSON object"));
        }
        Ok(to_output(payload.clone()))
    }

    async fn on_enabled(&self, ctx: &ExecutionContext) -> Result<()> {
        let step = ctx.current_step_id();
        if self.enabled.lock().await.insert(step.to_string()) {
            tracing::info!(step, "webhook trigger enabled");
        } else {
            tracing::debug!(step, "webhook trigger already enabled");
        }
        Ok(())
    }

    async fn on_disabled(&self, ctx: &ExecutionContext) -> Result<()> {
        let step = ctx.current_step_id();
        if self.enabled.lock().await.remove(step) {
            tracing::info!(step, "webhook trigger disabled");
        } else {
            tracing::debug!(step, "webhook trigger already disabled");
        }
        Ok(())
    }
}
