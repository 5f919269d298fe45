//! Execution context handed to actions and triggers
//!
//! A context is built fresh by the caller for every invocation and is
//! read-only to the unit. It carries the resolved credentials for the step,
//! the recorded state of every step in the workflow run so far, and the
//! identity of the step being executed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Resolved credentials for the current step
///
/// Which fields are populated depends on the integration's auth kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    /// Bearer/OAuth access token or API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Full token object as returned by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Value>,

    /// Token type, e.g. `Bearer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Basic auth username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Shared secret (signing key, webhook secret)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AuthContext {
    /// Credentials holding only an access token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            token_type: Some("Bearer".to_string()),
            ..Default::default()
        }
    }

    /// Credentials holding a username and password
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    /// Whether no credential field carries a value
    pub fn is_empty(&self) -> bool {
        present(&self.access_token).is_none()
            && self.token.as_ref().is_none_or(Value::is_null)
            && present(&self.username).is_none()
            && present(&self.password).is_none()
            && present(&self.secret).is_none()
    }

    /// Non-blank access token, or a precondition error naming `operation`
    pub fn require_token(&self, operation: &str) -> Result<&str> {
        present(&self.access_token)
            .ok_or_else(|| Error::precondition(operation, "an access token is required"))
    }

    /// Username and password, or a precondition error naming `operation`
    pub fn require_basic(&self, operation: &str) -> Result<(&str, &str)> {
        match (present(&self.username), self.password.as_deref()) {
            (Some(user), Some(pass)) => Ok((user, pass)),
            _ => Err(Error::precondition(
                operation,
                "a username and password are required",
            )),
        }
    }

    /// Non-blank secret, or a precondition error naming `operation`
    pub fn require_secret(&self, operation: &str) -> Result<&str> {
        present(&self.secret)
            .ok_or_else(|| Error::precondition(operation, "a secret is required"))
    }
}

/// Lifecycle status of a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Waiting to run
    #[default]
    Queued,
    /// Currently executing
    Running,
    /// Finished with a result
    Succeeded,
    /// Finished with an error
    Failed,
    /// Not executed (branch not taken)
    Skipped,
    /// Stopped before completion
    Cancelled,
}

impl StepStatus {
    /// Whether the step will not change status again
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Skipped | Self::Cancelled
        )
    }
}

/// Recorded input, output and status of one step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    /// Input payload the step was (or will be) invoked with
    #[serde(default)]
    pub input: Value,

    /// Output produced by the step, once it succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    /// Current status
    #[serde(default)]
    pub status: StepStatus,

    /// Error message of the last failed attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Start time (unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,

    /// Finish time (unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
}

impl StepState {
    /// A queued step with the given input
    pub fn queued(input: Value) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// A succeeded step with the given input and output
    pub fn succeeded(input: Value, output: Value) -> Self {
        Self {
            input,
            output: Some(output),
            status: StepStatus::Succeeded,
            ..Default::default()
        }
    }
}

/// Structural description of the step being run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetadata {
    /// Display label
    #[serde(default)]
    pub label: String,

    /// Icon URL or name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Ordinal position within the parent
    #[serde(default)]
    pub position: usize,

    /// Whether this step is the workflow's trigger
    #[serde(default)]
    pub is_trigger: bool,

    /// Nested steps of a composite or branching step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StepMetadata>,

    /// Identifier of the enclosing step, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Per-invocation bundle of auth, workflow state and step identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    auth: AuthContext,
    step_state: HashMap<String, StepState>,
    current_step_id: String,
    step_metadata: StepMetadata,
}

impl ExecutionContext {
    /// Start building a context for `step_id`
    pub fn builder(step_id: impl Into<String>) -> ExecutionContextBuilder {
        ExecutionContextBuilder::new(step_id)
    }

    /// Resolved credentials
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Identifier of the executing step
    pub fn current_step_id(&self) -> &str {
        &self.current_step_id
    }

    /// Structural description of the executing step
    pub fn step_metadata(&self) -> &StepMetadata {
        &self.step_metadata
    }

    /// State of every step in the run, keyed by step identifier
    pub fn step_state(&self) -> &HashMap<String, StepState> {
        &self.step_state
    }

    /// State of the executing step
    pub fn current_step(&self) -> Result<&StepState> {
        self.step_state.get(&self.current_step_id).ok_or_else(|| {
            Error::precondition(
                self.current_step_id.as_str(),
                "no state recorded for the current step",
            )
        })
    }

    /// Input payload of the executing step
    pub fn current_input(&self) -> Result<&Value> {
        self.current_step().map(|step| &step.input)
    }

    /// Output of a prior step, if it produced one
    pub fn step_output(&self, step_id: &str) -> Option<&Value> {
        self.step_state.get(step_id)?.output.as_ref()
    }

    /// Outputs of all steps that produced one, keyed by step identifier
    pub fn outputs(&self) -> Map<String, Value> {
        self.step_state
            .iter()
            .filter_map(|(id, step)| step.output.clone().map(|out| (id.clone(), out)))
            .collect()
    }
}

/// Builder for [`ExecutionContext`]
///
/// `build` always records an entry for the current step, so a context made
/// here satisfies the "current step exists" precondition.
#[derive(Debug, Clone)]
pub struct ExecutionContextBuilder {
    auth: AuthContext,
    step_state: HashMap<String, StepState>,
    current_step_id: String,
    input: Option<Value>,
    step_metadata: StepMetadata,
}

impl ExecutionContextBuilder {
    fn new(step_id: impl Into<String>) -> Self {
        Self {
            auth: AuthContext::default(),
            step_state: HashMap::new(),
            current_step_id: step_id.into(),
            input: None,
            step_metadata: StepMetadata::default(),
        }
    }

    /// Set the credentials
    pub fn auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    /// Set the input payload of the current step
    pub fn input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Record the state of another step
    pub fn step(mut self, step_id: impl Into<String>, state: StepState) -> Self {
        self.step_state.insert(step_id.into(), state);
        self
    }

    /// Record the state of several steps
    pub fn steps(mut self, steps: impl IntoIterator<Item = (String, StepState)>) -> Self {
        self.step_state.extend(steps);
        self
    }

    /// Set the structural description of the current step
    pub fn metadata(mut self, metadata: StepMetadata) -> Self {
        self.step_metadata = metadata;
        self
    }

    /// Finish the context, marking the current step as running
    pub fn build(self) -> ExecutionContext {
        let mut step_state = self.step_state;
        let current = step_state.entry(self.current_step_id.clone()).or_default();
        if let Some(input) = self.input {
            current.input = input;
        }
        if current.input.is_null() {
            current.input = Value::Object(Map::new());
        }
        current.status = StepStatus::Running;

        ExecutionContext {
            auth: self.auth,
            step_state,
            current_step_id: self.current_step_id,
            step_metadata: self.step_metadata,
        }
    }
}
