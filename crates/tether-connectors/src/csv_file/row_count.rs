//! Count data rows

use async_trait::async_trait;
use serde_json::json;
use tether_core::{Action, ExecutionContext, OperationInfo, Output, Result};

use super::{CsvParams, csv_schema, parse_error};

/// Counts the data rows of a CSV document
pub struct RowCount {
    info: OperationInfo,
}

impl RowCount {
    pub(super) fn new() -> Self {
        Self {
            info: OperationInfo::new("Count rows", "Count the data rows of a CSV document")
                .with_input(csv_schema())
                .with_sample_output(json!({"rowCount": 2})),
        }
    }
}

#[async_trait]
impl Action for RowCount {
    fn id(&self) -> &str {
        "row_count"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let params: CsvParams = ctx.bind_input(self.id(), &self.info)?;
        let mut reader = params.reader(self.id())?;

        let mut count = 0u64;
        for record in reader.byte_records() {
            record.map_err(|e| parse_error(self.id(), e))?;
            count += 1;
        }

        tracing::debug!(rows = count, "counted CSV rows");
        let mut output = Output::new();
        output.insert("rowCount".to_string(), json!(count));
        Ok(output)
    }
}
