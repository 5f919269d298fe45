//! Runner tests against the bundled integrations

use serde_json::json;
use std::sync::Arc;
use tether_core::{AuthContext, StepState, StepStatus};
use tether_runtime::{Runner, RunnerConfig, StepJob, StepOutcome};

fn runner() -> Runner {
    let catalog = tether_connectors::catalog().unwrap();
    Runner::new(Arc::new(catalog), RunnerConfig::default())
}

#[tokio::test]
async fn test_row_count_step() {
    let outcome = runner()
        .execute_step(
            StepJob::new("csv", "row_count").with_input(json!({"content": "a,b\n1,2\n3,4"})),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, StepOutcome::Succeeded { attempts: 1, .. }));
    assert_eq!(outcome.output(), Some(&json!({"rowCount": 2})));
}

#[tokio::test]
async fn test_chained_steps_share_outputs() {
    let runner = runner();
    let first = runner
        .execute_step(
            StepJob::new("csv", "row_count")
                .with_step_id("count")
                .with_input(json!({"content": "h\n1\n2\n3"})),
        )
        .await
        .unwrap();
    assert_eq!(first.state().status, StepStatus::Succeeded);

    let second = runner
        .execute_step(
            StepJob::new("script", "template")
                .with_step_id("render")
                .with_prior_step("count", first.state().clone())
                .with_input(json!({"template": "{{ steps.count.rowCount }} rows"})),
        )
        .await
        .unwrap();
    assert_eq!(second.output().unwrap()["result"], "3 rows");
}

#[tokio::test]
async fn test_binding_failure_halts() {
    let outcome = runner()
        .execute_step(StepJob::new("csv", "row_count"))
        .await
        .unwrap();
    assert!(outcome.is_halted());
    assert_eq!(outcome.attempts(), 1);
    assert!(outcome.error().unwrap().contains("content"));
}

#[tokio::test]
async fn test_webhook_without_token_halts_without_retrying() {
    let outcome = runner()
        .execute_step(
            StepJob::new("webhook", "send")
                .with_input(json!({"url": "http://127.0.0.1:9/never"}))
                .with_auth(AuthContext::bearer("")),
        )
        .await
        .unwrap();
    assert!(outcome.is_halted());
    assert_eq!(outcome.attempts(), 1);
    assert!(outcome.error().unwrap().contains("precondition failed"));
}

#[tokio::test]
async fn test_webhook_bad_header_value_is_not_retried() {
    let outcome = runner()
        .execute_step(
            StepJob::new("webhook", "send")
                .with_input(json!({
                    "url": "http://127.0.0.1:9/never",
                    "headers": {"X-A": "bad\nvalue"}
                }))
                .with_auth(AuthContext::bearer("t")),
        )
        .await
        .unwrap();
    assert!(outcome.is_halted());
    assert_eq!(outcome.attempts(), 1);
    assert!(outcome.error().unwrap().contains("invalid value for header 'X-A'"));
}

#[tokio::test]
async fn test_webhook_test_mode_returns_sample() {
    let outcome = runner()
        .execute_step(
            StepJob::new("webhook", "send")
                .with_input(json!({"url": "http://127.0.0.1:9/never"}))
                .with_auth(AuthContext::bearer("t"))
                .test_mode(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.output(), Some(&json!({"status": 200, "body": {"ok": true}})));
}

#[tokio::test]
async fn test_manual_trigger_step() {
    let outcome = runner()
        .execute_step(StepJob::new("manual", "trigger"))
        .await
        .unwrap();
    assert_eq!(outcome.output(), Some(&json!({})));
    assert_eq!(
        outcome.state(),
        &StepState {
            started_at: outcome.state().started_at,
            finished_at: outcome.state().finished_at,
            ..StepState::succeeded(json!({}), json!({}))
        }
    );
}

#[tokio::test]
async fn test_unknown_integration_is_error() {
    let err = runner()
        .execute_step(StepJob::new("nope", "x"))
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("integration not found: nope"));
}
