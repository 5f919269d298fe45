//! Step execution engine

use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tether_core::{
    Catalog, Error as UnitError, ExecutionContext, Output, RuntimeConfig, StepState, StepStatus,
    Unit,
};

use crate::error::Result;
use crate::jobs::StepJob;

/// Retry and timeout settings for a [`Runner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Extra attempts after the first, for units whose policy retries
    pub max_retries: u32,
    /// Delay between attempts
    pub retry_backoff: Duration,
    /// Upper bound on one attempt
    pub step_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

impl From<&RuntimeConfig> for RunnerConfig {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
            step_timeout: config.step_timeout(),
        }
    }
}

/// Result of executing one step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The unit returned an output
    Succeeded {
        /// Final step state
        state: StepState,
        /// Attempts made
        attempts: u32,
    },
    /// The unit failed but its policy lets the workflow go on
    Continued {
        /// Final step state
        state: StepState,
        /// Attempts made
        attempts: u32,
        /// Last error
        error: String,
    },
    /// The unit failed and the workflow must stop
    Halted {
        /// Final step state
        state: StepState,
        /// Attempts made
        attempts: u32,
        /// Last error
        error: String,
    },
}

impl StepOutcome {
    /// Final step state
    pub fn state(&self) -> &StepState {
        match self {
            Self::Succeeded { state, .. }
            | Self::Continued { state, .. }
            | Self::Halted { state, .. } => state,
        }
    }

    /// Attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. }
            | Self::Continued { attempts, .. }
            | Self::Halted { attempts, .. } => *attempts,
        }
    }

    /// Error text of the last failed attempt
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Continued { error, .. } | Self::Halted { error, .. } => Some(error),
        }
    }

    /// Output of a succeeded step
    pub fn output(&self) -> Option<&Value> {
        self.state().output.as_ref()
    }

    /// Whether the workflow must stop after this step
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted { .. })
    }
}

/// Runtime engine for executing steps
#[derive(Debug, Clone)]
pub struct Runner {
    catalog: Arc<Catalog>,
    config: RunnerConfig,
}

impl Runner {
    /// Create a runner over a fully registered catalog
    pub fn new(catalog: Arc<Catalog>, config: RunnerConfig) -> Self {
        Self { catalog, config }
    }

    /// Catalog this runner resolves units from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute one step
    ///
    /// Returns `Err` only when the unit cannot be resolved. Failures of the
    /// unit itself are reported as [`StepOutcome::Continued`] or
    /// [`StepOutcome::Halted`] according to its error policy.
    pub async fn execute_step(&self, job: StepJob) -> Result<StepOutcome> {
        let name = job.qualified_name();
        let unit = self
            .catalog
            .resolve(&job.integration, &job.operation)
            .with_context(|| format!("cannot execute step '{}'", job.step_id))?;
        let policy = unit.info().error_policy;
        let ctx = job.context();

        let mut state = StepState::queued(job.input.clone());
        state.status = StepStatus::Running;
        state.started_at = Some(now_millis());

        tracing::info!(
            step = %job.step_id,
            operation = %name,
            test_mode = job.metadata.test_mode,
            run_id = job.metadata.run_id.as_deref().unwrap_or("-"),
            "executing step"
        );

        let mut attempts = 0;
        let result = loop {
            attempts += 1;
            let error = if unit.info().requires_auth && job.auth.is_empty() {
                UnitError::precondition(
                    name.as_str(),
                    "credentials are required but none were resolved",
                )
            } else {
                match self.attempt(&unit, &ctx, job.metadata.test_mode).await {
                    Ok(output) => break Ok(output),
                    Err(error) => error,
                }
            };

            let retry = policy.retry_on_error
                && error.is_retryable()
                && attempts <= self.config.max_retries;
            if !retry {
                break Err(error);
            }
            tracing::warn!(
                step = %job.step_id,
                operation = %name,
                attempt = attempts,
                error = %error,
                "step failed, retrying"
            );
            if !self.config.retry_backoff.is_zero() {
                tokio::time::sleep(self.config.retry_backoff).await;
            }
        };
        state.finished_at = Some(now_millis());

        Ok(match result {
            Ok(output) => {
                tracing::info!(step = %job.step_id, operation = %name, attempts, "step succeeded");
                state.status = StepStatus::Succeeded;
                state.output = Some(Value::Object(output));
                StepOutcome::Succeeded { state, attempts }
            }
            Err(error) => {
                let message = error.to_string();
                state.status = StepStatus::Failed;
                state.error = Some(message.clone());
                if policy.continue_on_error {
                    tracing::warn!(
                        step = %job.step_id,
                        operation = %name,
                        error = %message,
                        "step failed, continuing"
                    );
                    StepOutcome::Continued {
                        state,
                        attempts,
                        error: message,
                    }
                } else {
                    tracing::error!(
                        step = %job.step_id,
                        operation = %name,
                        kind = ?error.kind(),
                        error = %message,
                        "step failed, halting"
                    );
                    StepOutcome::Halted {
                        state,
                        attempts,
                        error: message,
                    }
                }
            }
        })
    }

    async fn attempt(
        &self,
        unit: &Unit,
        ctx: &ExecutionContext,
        test_mode: bool,
    ) -> tether_core::Result<Output> {
        let call = async {
            if test_mode {
                unit.test(ctx).await
            } else {
                unit.run(ctx).await
            }
        };
        match self.config.step_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(UnitError::upstream(
                    unit.id(),
                    format!("timed out after {}ms", limit.as_millis()),
                ))
            }),
            None => call.await,
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
