//! CSV integration

mod row_count;
mod to_json;

use serde::Deserialize;
use std::sync::Arc;
use tether_core::{
    Action, Error, FieldDescriptor, InputSchema, Integration, IntegrationMetadata, Result,
};

pub use row_count::RowCount;
pub use to_json::ToJson;

const DESCRIPTOR: &str = include_str!("integration.yaml");
const DOCUMENTATION: &str = include_str!("README.md");

/// Integration for CSV documents
pub struct CsvIntegration {
    metadata: IntegrationMetadata,
    row_count: Arc<RowCount>,
    to_json: Arc<ToJson>,
}

impl CsvIntegration {
    /// Parse the bundled descriptor and build the actions
    pub fn new() -> Result<Self> {
        Ok(Self {
            metadata: IntegrationMetadata::from_descriptor(DESCRIPTOR, DOCUMENTATION)?,
            row_count: Arc::new(RowCount::new()),
            to_json: Arc::new(ToJson::new()),
        })
    }
}

impl Integration for CsvIntegration {
    fn id(&self) -> &str {
        "csv"
    }

    fn metadata(&self) -> &IntegrationMetadata {
        &self.metadata
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        vec![
            self.row_count.clone() as Arc<dyn Action>,
            self.to_json.clone() as Arc<dyn Action>,
        ]
    }
}

/// Inputs shared by every CSV action
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvParams {
    content: String,
    delimiter: String,
    has_header: bool,
}

fn csv_schema() -> InputSchema {
    InputSchema::new()
        .field(
            "content",
            FieldDescriptor::long_text("CSV content")
                .with_description("The document to read")
                .required(),
        )
        .field(
            "delimiter",
            FieldDescriptor::short_text("Delimiter")
                .with_description("Single ASCII character separating fields")
                .with_default(","),
        )
        .field(
            "hasHeader",
            FieldDescriptor::boolean("First row is a header").with_default(true),
        )
}

impl CsvParams {
    fn reader(&self, operation: &str) -> Result<::csv::Reader<&[u8]>> {
        let delimiter = match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => {
                return Err(Error::binding(
                    operation,
                    format!(
                        "delimiter must be a single ASCII character, got '{}'",
                        self.delimiter
                    ),
                ));
            }
        };

        Ok(::csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.has_header)
            .from_reader(self.content.as_bytes()))
    }
}

fn parse_error(operation: &str, err: ::csv::Error) -> Error {
    Error::binding(operation, format!("malformed CSV: {}", err))
}
