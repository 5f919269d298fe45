//! Action and trigger contract
//!
//! Every pluggable unit exposes a static [`OperationInfo`] and executes
//! against an [`ExecutionContext`], returning a JSON object. Units never
//! retry or swallow failures; every error is returned to the caller, which
//! applies the unit's [`ErrorPolicy`](crate::schema::ErrorPolicy).

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::schema::OperationInfo;

/// Result of a successful invocation
pub type Output = Map<String, Value>;

/// Turn any JSON value into an [`Output`]
///
/// Objects are used as-is, anything else is wrapped under `"result"`.
pub fn to_output(value: Value) -> Output {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}

/// A unit invoked as a workflow step
#[async_trait]
pub trait Action: Send + Sync {
    /// Identifier, unique within the integration
    fn id(&self) -> &str;

    /// Static descriptor
    fn info(&self) -> &OperationInfo;

    /// Perform the work
    async fn run(&self, ctx: &ExecutionContext) -> Result<Output>;

    /// Validation run
    ///
    /// Delegates to [`Action::run`] unless the action has outward side
    /// effects, in which case it must not perform them.
    async fn test(&self, ctx: &ExecutionContext) -> Result<Output> {
        self.run(ctx).await
    }
}

/// A unit that starts workflow runs
#[async_trait]
pub trait Trigger: Send + Sync {
    /// Identifier, unique within the integration
    fn id(&self) -> &str;

    /// Static descriptor
    fn info(&self) -> &OperationInfo;

    /// Produce the trigger payload
    async fn run(&self, ctx: &ExecutionContext) -> Result<Output>;

    /// Validation run, see [`Action::test`]
    async fn test(&self, ctx: &ExecutionContext) -> Result<Output> {
        self.run(ctx).await
    }

    /// Called when a workflow containing this trigger becomes active.
    /// Enabling twice must succeed.
    async fn on_enabled(&self, _ctx: &ExecutionContext) -> Result<()> {
        Ok(())
    }

    /// Called when a workflow containing this trigger becomes inactive.
    /// Disabling twice must succeed.
    async fn on_disabled(&self, _ctx: &ExecutionContext) -> Result<()> {
        Ok(())
    }
}

/// Either kind of unit, for uniform lookup
#[derive(Clone)]
pub enum Unit {
    /// An action
    Action(Arc<dyn Action>),
    /// A trigger
    Trigger(Arc<dyn Trigger>),
}

impl Unit {
    /// Identifier of the wrapped unit
    pub fn id(&self) -> &str {
        match self {
            Self::Action(a) => a.id(),
            Self::Trigger(t) => t.id(),
        }
    }

    /// Descriptor of the wrapped unit
    pub fn info(&self) -> &OperationInfo {
        match self {
            Self::Action(a) => a.info(),
            Self::Trigger(t) => t.info(),
        }
    }

    /// Whether this is a trigger
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Trigger(_))
    }

    /// Run the wrapped unit
    pub async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        match self {
            Self::Action(a) => a.run(ctx).await,
            Self::Trigger(t) => t.run(ctx).await,
        }
    }

    /// Test-run the wrapped unit
    pub async fn test(&self, ctx: &ExecutionContext) -> Result<Output> {
        match self {
            Self::Action(a) => a.test(ctx).await,
            Self::Trigger(t) => t.test(ctx).await,
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_trigger() { "Trigger" } else { "Action" };
        f.debug_tuple(kind).field(&self.id()).finish()
    }
}
