//! Run a single step command

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::sync::Arc;
use tether_core::AuthContext;
use tether_runtime::{Runner, RunnerConfig, StepJob, StepOutcome};

/// Run the run command
pub async fn run(
    config_path: &str,
    integration: &str,
    operation: &str,
    input: &str,
    token: Option<&str>,
    test: bool,
) -> Result<()> {
    let (config, catalog) = super::load_catalog(config_path)?;

    let input: Value = serde_json::from_str(input).context("--input is not valid JSON")?;
    if !input.is_object() {
        bail!("--input must be a JSON object");
    }

    let mut job = StepJob::new(integration, operation).with_input(input);
    if let Some(token) = token {
        job = job.with_auth(AuthContext::bearer(token));
    }
    if test {
        job = job.test_mode();
    }

    let runner = Runner::new(
        Arc::new(catalog),
        RunnerConfig::from(&config.project.runtime),
    );
    let outcome = runner.execute_step(job).await?;

    let status = match &outcome {
        StepOutcome::Succeeded { .. } => "succeeded",
        StepOutcome::Continued { .. } => "continued",
        StepOutcome::Halted { .. } => "halted",
    };
    let report = json!({
        "status": status,
        "attempts": outcome.attempts(),
        "output": outcome.output(),
        "error": outcome.error(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let StepOutcome::Halted { error, .. } = outcome {
        bail!("Step {}.{} failed: {}", integration, operation, error);
    }
    Ok(())
}
