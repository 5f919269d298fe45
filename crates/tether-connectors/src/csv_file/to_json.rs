//! Convert CSV to JSON

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tether_core::{Action, ExecutionContext, OperationInfo, Output, Result};

use super::{CsvParams, csv_schema, parse_error};

/// Converts a CSV document into JSON rows
pub struct ToJson {
    info: OperationInfo,
}

impl ToJson {
    pub(super) fn new() -> Self {
        Self {
            info: OperationInfo::new("Convert to JSON", "Convert a CSV document to JSON rows")
                .with_input(csv_schema())
                .with_sample_output(json!({
                    "headers": ["name", "age"],
                    "rows": [{"name": "Alice", "age": "30"}]
                })),
        }
    }
}

#[async_trait]
impl Action for ToJson {
    fn id(&self) -> &str {
        "to_json"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let params: CsvParams = ctx.bind_input(self.id(), &self.info)?;
        let mut reader = params.reader(self.id())?;

        let headers: Vec<String> = if params.has_header {
            reader
                .headers()
                .map_err(|e| parse_error(self.id(), e))?
                .iter()
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| parse_error(self.id(), e))?;
            let row = if headers.is_empty() {
                Value::Array(record.iter().map(|f| json!(f)).collect())
            } else {
                let object: Map<String, Value> = headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(|f| json!(f)))
                    .collect();
                Value::Object(object)
            };
            rows.push(row);
        }

        let mut output = Output::new();
        output.insert("headers".to_string(), json!(headers));
        output.insert("rows".to_string(), Value::Array(rows));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn convert(input: Value) -> Output {
        let ctx = ExecutionContext::builder("csv").input(input).build();
        ToJson::new().run(&ctx).await.unwrap()
    }

    #[tokio::test]
    async fn test_rows_keyed_by_header() {
        let output = convert(json!({"content": "name,age\nAlice,30\nBob,25"})).await;
        assert_eq!(output["headers"], json!(["name", "age"]));
        assert_eq!(
            output["rows"],
            json!([
                {"name": "Alice", "age": "30"},
                {"name": "Bob", "age": "25"}
            ])
        );
    }

    #[tokio::test]
    async fn test_rows_as_arrays_without_header() {
        let output = convert(json!({"content": "1,2\n3,4", "hasHeader": false})).await;
        assert_eq!(output["headers"], json!([]));
        assert_eq!(output["rows"], json!([["1", "2"], ["3", "4"]]));
    }

    #[tokio::test]
    async fn test_header_only_document() {
        let output = convert(json!({"content": "a,b\n"})).await;
        assert_eq!(output["headers"], json!(["a", "b"]));
        assert_eq!(output["rows"], json!([]));
    }
}
