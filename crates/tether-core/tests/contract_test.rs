//! End-to-end checks of the connector contract using a small integration
//! written only against the public API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tether_core::{
    Action, AuthKind, AuthRequirement, Catalog, ErrorKind, ExecutionContext, FieldDescriptor,
    InputBinder, InputSchema, Integration, IntegrationMetadata, OperationInfo, Output, Result,
    Spider, StepState, Trigger, to_output,
};

#[derive(Deserialize)]
struct GreetInput {
    name: String,
    greeting: String,
}

struct Greet {
    info: OperationInfo,
}

impl Greet {
    fn new() -> Self {
        Self {
            info: OperationInfo::new("Greet", "Say hello")
                .with_input(
                    InputSchema::new()
                        .field("name", FieldDescriptor::short_text("Name").required())
                        .field(
                            "greeting",
                            FieldDescriptor::short_text("Greeting").with_default("Hello"),
                        ),
                )
                .with_sample_output(json!({"message": "Hello, world"}))
                .requires_auth(),
        }
    }
}

#[async_trait]
impl Action for Greet {
    fn id(&self) -> &str {
        "greet"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        ctx.auth().require_token(self.id())?;
        let input: GreetInput = ctx.bind_input(self.id(), &self.info)?;
        Ok(to_output(json!({
            "message": format!("{}, {}", input.greeting, input.name)
        })))
    }
}

struct Tick {
    info: OperationInfo,
    enabled: AtomicUsize,
}

#[async_trait]
impl Trigger for Tick {
    fn id(&self) -> &str {
        "tick"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let previous = ctx.step_output("previous_tick").cloned().unwrap_or(json!({"n": 0}));
        let n = previous["n"].as_u64().unwrap_or(0) + 1;
        Ok(to_output(json!({"n": n})))
    }

    async fn on_enabled(&self, _ctx: &ExecutionContext) -> Result<()> {
        self.enabled.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Greeter {
    metadata: IntegrationMetadata,
    greet: Arc<Greet>,
    tick: Arc<Tick>,
}

impl Greeter {
    fn new() -> Self {
        Self {
            metadata: IntegrationMetadata::from_descriptor(
                concat!(
                    "name: Greeter\n",
                    "description: Greets people\n",
                    "version: '2.0.0'\n",
                    "category: demo\n",
                    "icon: wave\n",
                ),
                "# Greeter\n",
            )
            .unwrap(),
            greet: Arc::new(Greet::new()),
            tick: Arc::new(Tick {
                info: OperationInfo::new("Tick", "Counts invocations"),
                enabled: AtomicUsize::new(0),
            }),
        }
    }
}

impl Integration for Greeter {
    fn id(&self) -> &str {
        "greeter"
    }

    fn metadata(&self) -> &IntegrationMetadata {
        &self.metadata
    }

    fn auth(&self) -> AuthRequirement {
        AuthRequirement::required(AuthKind::ApiKey)
    }

    fn triggers(&self) -> Vec<Arc<dyn Trigger>> {
        vec![self.tick.clone() as Arc<dyn Trigger>]
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        vec![self.greet.clone() as Arc<dyn Action>]
    }
}

#[tokio::test]
async fn test_greeter_through_spider() {
    let spider = Spider::new(Greeter::new());
    assert_eq!(spider.config().display_name, "Greeter");
    assert_eq!(spider.config().logo, "wave");
    assert_eq!(spider.operations().len(), 1);
    assert_eq!(spider.triggers().len(), 1);

    let ctx = spider.context_with_auth(
        json!({"name": "Ada"}),
        tether_core::AuthContext::bearer("key"),
    );
    let output = spider.run_operation("greet", &ctx).await.unwrap();
    assert_eq!(output["message"], "Hello, Ada");

    // Default test mode delegates to run
    let tested = spider.test_operation("greet", &ctx).await.unwrap();
    assert_eq!(tested, output);
}

#[tokio::test]
async fn test_greeter_errors() {
    let spider = Spider::new(Greeter::new());

    let no_auth = spider.context_for(json!({"name": "Ada"}));
    let err = spider.run_operation("greet", &no_auth).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);

    let no_name = spider.context_with_auth(json!({}), tether_core::AuthContext::bearer("key"));
    let err = spider.run_operation("greet", &no_name).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Binding);
    assert!(err.to_string().contains("name"));
}

#[tokio::test]
async fn test_trigger_reads_prior_state() {
    let spider = Spider::new(Greeter::new());
    let ctx = ExecutionContext::builder("tick_2")
        .step(
            "previous_tick",
            StepState::succeeded(json!({}), json!({"n": 41})),
        )
        .build();
    let output = spider.run_trigger("tick", &ctx).await.unwrap();
    assert_eq!(Value::Object(output), json!({"n": 42}));

    spider.enable_trigger("tick", &ctx).await.unwrap();
    spider.disable_trigger("tick", &ctx).await.unwrap();
}

#[tokio::test]
async fn test_enable_hook_reaches_shared_trigger() {
    let greeter = Greeter::new();
    let tick = greeter.tick.clone();
    let spider = Spider::new(greeter);
    let ctx = spider.context_for(json!({}));
    spider.enable_trigger("tick", &ctx).await.unwrap();
    spider.enable_trigger("tick", &ctx).await.unwrap();
    assert_eq!(tick.enabled.load(Ordering::SeqCst), 2);
}

#[test]
fn test_binder_modes_on_public_schema() {
    let greet = Greet::new();
    let binder = InputBinder::for_operation(greet.id(), greet.info());

    let bound: GreetInput = binder.bind(&json!({"name": "Grace"})).unwrap();
    assert_eq!(bound.greeting, "Hello");

    let missing: Option<GreetInput> = binder.bind_permissive(&json!({"greeting": "Hi"}));
    assert!(missing.is_none());
}

#[test]
fn test_catalog_resolution_and_validation() {
    let mut catalog = Catalog::new();
    let handle = catalog.register(Greeter::new());
    assert_eq!(handle.integration_id, "greeter");
    assert_eq!((handle.actions, handle.triggers), (1, 1));

    assert!(catalog.action("greeter", "greet").is_ok());
    assert!(catalog.trigger("greeter", "tick").is_ok());
    assert!(catalog.resolve("greeter", "tick").unwrap().is_trigger());
    assert_eq!(
        catalog.trigger("greeter", "greet").err().unwrap().kind(),
        ErrorKind::NotFound
    );
    assert!(catalog.validate().is_empty());
}
