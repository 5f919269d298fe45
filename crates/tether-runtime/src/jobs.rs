//! Step job definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tether_core::{AuthContext, ExecutionContext, StepMetadata, StepState};

/// Step identifier used when the caller does not name one
pub const DEFAULT_STEP_ID: &str = "step_1";

/// Request to execute one unit as one workflow step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepJob {
    /// Integration identifier
    pub integration: String,

    /// Action or trigger identifier within the integration
    pub operation: String,

    /// Identifier of the step being executed
    pub step_id: String,

    /// Input payload for the step
    #[serde(default)]
    pub input: Value,

    /// Resolved credentials
    #[serde(default)]
    pub auth: AuthContext,

    /// State of earlier steps in the same run
    #[serde(default)]
    pub prior_steps: HashMap<String, StepState>,

    /// Job metadata
    #[serde(default)]
    pub metadata: JobMetadata,
}

/// Job metadata
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobMetadata {
    /// Workflow run this step belongs to
    pub run_id: Option<String>,

    /// Call `test` instead of `run`
    pub test_mode: bool,

    /// Structural description of the step
    pub step: StepMetadata,

    /// Enqueue timestamp (unix millis)
    pub timestamp: Option<i64>,
}

impl StepJob {
    /// Create a job for `integration`.`operation` with an empty input
    pub fn new(integration: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            integration: integration.into(),
            operation: operation.into(),
            step_id: DEFAULT_STEP_ID.to_string(),
            input: Value::Object(Default::default()),
            auth: AuthContext::default(),
            prior_steps: HashMap::new(),
            metadata: JobMetadata {
                run_id: Some(uuid::Uuid::new_v4().to_string()),
                timestamp: Some(chrono::Utc::now().timestamp_millis()),
                ..Default::default()
            },
        }
    }

    /// Set the input payload
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Set the credentials
    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    /// Set the step identifier
    pub fn with_step_id(mut self, step_id: impl Into<String>) -> Self {
        self.step_id = step_id.into();
        self
    }

    /// Record the state of an earlier step
    pub fn with_prior_step(mut self, step_id: impl Into<String>, state: StepState) -> Self {
        self.prior_steps.insert(step_id.into(), state);
        self
    }

    /// Set the workflow run identifier
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.metadata.run_id = Some(run_id.into());
        self
    }

    /// Invoke the unit's test mode
    pub fn test_mode(mut self) -> Self {
        self.metadata.test_mode = true;
        self
    }

    /// Fully qualified `integration.operation` name, for logs
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.integration, self.operation)
    }

    /// Build the execution context handed to the unit
    pub fn context(&self) -> ExecutionContext {
        ExecutionContext::builder(self.step_id.as_str())
            .auth(self.auth.clone())
            .steps(
                self.prior_steps
                    .iter()
                    .filter(|(id, _)| **id != self.step_id)
                    .map(|(id, state)| (id.clone(), state.clone())),
            )
            .input(self.input.clone())
            .metadata(self.metadata.step.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::StepStatus;

    #[test]
    fn test_job_metadata_default() {
        let metadata = JobMetadata::default();
        assert!(metadata.run_id.is_none());
        assert!(!metadata.test_mode);
        assert!(metadata.timestamp.is_none());
    }

    #[test]
    fn test_step_job_new() {
        let job = StepJob::new("csv", "row_count");
        assert_eq!(job.integration, "csv");
        assert_eq!(job.operation, "row_count");
        assert_eq!(job.step_id, DEFAULT_STEP_ID);
        assert_eq!(job.input, json!({}));
        assert!(job.auth.is_empty());
        assert!(job.metadata.run_id.is_some());
        assert!(job.metadata.timestamp.is_some());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = StepJob::new("x", "y");
        let b = StepJob::new("x", "y");
        assert_ne!(a.metadata.run_id, b.metadata.run_id);
    }

    #[test]
    fn test_step_job_chained_builders() {
        let job = StepJob::new("webhook", "send")
            .with_input(json!({"url": "http://localhost"}))
            .with_auth(AuthContext::bearer("t"))
            .with_step_id("step_3")
            .with_run_id("run-abc")
            .test_mode();

        assert_eq!(job.qualified_name(), "webhook.send");
        assert_eq!(job.step_id, "step_3");
        assert_eq!(job.metadata.run_id.as_deref(), Some("run-abc"));
        assert!(job.metadata.test_mode);
        assert_eq!(job.auth.access_token.as_deref(), Some("t"));
    }

    #[test]
    fn test_context_carries_prior_steps() {
        let job = StepJob::new("script", "template")
            .with_step_id("step_2")
            .with_prior_step("step_1", StepState::succeeded(json!({}), json!({"n": 1})))
            .with_input(json!({"template": "x"}));

        let ctx = job.context();
        assert_eq!(ctx.current_step_id(), "step_2");
        assert_eq!(ctx.current_input().unwrap()["template"], "x");
        assert_eq!(ctx.step_output("step_1").unwrap()["n"], 1);
        assert_eq!(ctx.current_step().unwrap().status, StepStatus::Running);
    }

    #[test]
    fn test_prior_entry_for_current_step_is_ignored() {
        let job = StepJob::new("a", "b")
            .with_step_id("s")
            .with_prior_step("s", StepState::succeeded(json!({"old": 1}), json!({})))
            .with_input(json!({"new": 1}));

        let ctx = job.context();
        assert_eq!(ctx.current_input().unwrap(), &json!({"new": 1}));
        assert!(ctx.step_output("s").is_none());
    }

    #[test]
    fn test_step_job_serialization() {
        let job = StepJob::new("csv", "to_json")
            .with_input(json!({"content": "a\n1"}))
            .with_run_id("r1");

        let serialized = serde_json::to_string(&job).unwrap();
        let deserialized: StepJob = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.integration, job.integration);
        assert_eq!(deserialized.operation, job.operation);
        assert_eq!(deserialized.input, job.input);
        assert_eq!(deserialized.metadata.run_id, job.metadata.run_id);
    }
}
