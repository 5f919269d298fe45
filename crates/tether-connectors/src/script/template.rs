//! Jinja template rendering

use async_trait::async_trait;
use minijinja::{Environment, UndefinedBehavior, context};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tether_core::{
    Action, Error, ExecutionContext, FieldDescriptor, InputSchema, OperationInfo, Output, Result,
};

#[derive(Debug, Deserialize)]
struct TemplateParams {
    template: String,
    #[serde(default)]
    vars: Map<String, Value>,
}

/// Renders a Jinja template against step data
pub struct Template {
    info: OperationInfo,
    env: Environment<'static>,
}

impl Template {
    pub(super) fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        Self {
            info: OperationInfo::new("Render template", "Render a Jinja template")
                .with_input(
                    InputSchema::new()
                        .field(
                            "template",
                            FieldDescriptor::code("Template", "jinja")
                                .with_description("Sees `vars` and `steps`")
                                .required(),
                        )
                        .field(
                            "vars",
                            FieldDescriptor::code("Variables", "json")
                                .with_description("JSON object exposed as `vars`")
                                .with_default(json!({})),
                        ),
                )
                .with_sample_output(json!({"result": "Hello, Alice!"})),
            env,
        }
    }
}

#[async_trait]
impl Action for Template {
    fn id(&self) -> &str {
        "template"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let params: TemplateParams = ctx.bind_input(self.id(), &self.info)?;

        let rendered = self
            .env
            .render_str(
                &params.template,
                context! {
                    vars => params.vars,
                    steps => ctx.outputs(),
                },
            )
            .map_err(|e| Error::upstream(self.id(), e))?;

        let mut output = Output::new();
        output.insert("result".to_string(), Value::String(rendered));
        Ok(output)
    }
}
