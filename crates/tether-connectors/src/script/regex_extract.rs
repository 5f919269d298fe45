//! Regular expression extraction

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tether_core::{
    Action, Error, ExecutionContext, FieldDescriptor, InputSchema, OperationInfo, Output, Result,
};

#[derive(Debug, Deserialize)]
struct RegexParams {
    pattern: String,
    text: String,
}

/// Extracts named capture groups from text
pub struct RegexExtract {
    info: OperationInfo,
}

impl RegexExtract {
    pub(super) fn new() -> Self {
        Self {
            info: OperationInfo::new(
                "Extract with regex",
                "Return the named capture groups of the first match",
            )
            .with_input(
                InputSchema::new()
                    .field(
                        "pattern",
                        FieldDescriptor::code("Pattern", "regex").required(),
                    )
                    .field("text", FieldDescriptor::long_text("Text").required()),
            )
            .with_sample_output(json!({
                "matched": true,
                "match": "order-1234",
                "groups": {"id": "1234"}
            })),
        }
    }
}

#[async_trait]
impl Action for RegexExtract {
    fn id(&self) -> &str {
        "regex_extract"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let params: RegexParams = ctx.bind_input(self.id(), &self.info)?;
        let regex = Regex::new(&params.pattern)
            .map_err(|e| Error::binding(self.id(), format!("invalid pattern: {}", e)))?;

        let mut output = Output::new();
        let Some(captures) = regex.captures(&params.text) else {
            output.insert("matched".to_string(), json!(false));
            output.insert("match".to_string(), Value::Null);
            output.insert("groups".to_string(), json!({}));
            return Ok(output);
        };

        let groups: Map<String, Value> = regex
            .capture_names()
            .flatten()
            .map(|name| {
                let value = captures
                    .name(name)
                    .map_or(Value::Null, |m| json!(m.as_str()));
                (name.to_string(), value)
            })
            .collect();

        output.insert("matched".to_string(), json!(true));
        output.insert("match".to_string(), json!(&captures[0]));
        output.insert("groups".to_string(), Value::Object(groups));
        Ok(output)
    }
}
