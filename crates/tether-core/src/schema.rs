//! Operation descriptors and input schemas
//!
//! Every action and trigger describes itself with an [`OperationInfo`]. The
//! descriptor is static: it is built once when the unit is constructed and
//! never changes afterwards.
//!
//! # Example
//!
//! ```yaml
//! name: Count rows
//! description: Counts the data rows of a CSV document
//! inputSchema:
//!   content:
//!     label: CSV content
//!     required: true
//!     kind:
//!       type: longText
//! sampleOutput:
//!   rowCount: 2
//! errorPolicy:
//!   continueOnError: false
//!   retryOnError: false
//! requiresAuth: false
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a field is presented and edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    /// Single-line text
    ShortText,
    /// Multi-line text
    LongText,
    /// Numeric value
    Number,
    /// Toggle
    Boolean,
    /// One value from a fixed list
    Select {
        /// Allowed values
        options: Vec<String>,
    },
    /// Code editor with syntax highlighting for `language`
    #[serde(rename_all = "camelCase")]
    CodeEditor {
        /// Language identifier (e.g. `jinja`, `regex`)
        language: String,
    },
    /// Credential fields rendered by the integration's auth form
    CustomAuth {
        /// Names of the credential fields
        fields: Vec<String>,
    },
}

/// Describes one input parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Display label
    pub label: String,

    /// Help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the field must be present and non-null
    #[serde(default)]
    pub required: bool,

    /// Value used when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Presentation kind
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create an optional field of the given kind
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            description: None,
            required: false,
            default: None,
            kind,
        }
    }

    /// Single-line text field
    pub fn short_text(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::ShortText)
    }

    /// Multi-line text field
    pub fn long_text(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::LongText)
    }

    /// Boolean toggle
    pub fn boolean(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Boolean)
    }

    /// Numeric field
    pub fn number(label: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Number)
    }

    /// Selection from a fixed list of options
    pub fn select<I, S>(label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            label,
            FieldKind::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Code editor for `language`
    pub fn code(label: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(
            label,
            FieldKind::CodeEditor {
                language: language.into(),
            },
        )
    }

    /// Set the help text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the value used when the field is absent
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered mapping from parameter name to its descriptor
///
/// Order is display order only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSchema(IndexMap<String, FieldDescriptor>);

impl InputSchema {
    /// Empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous field with the same name
    pub fn field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.0.insert(name.into(), field);
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.0.get(name)
    }

    /// Iterate fields in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.0.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Names of required fields, in display order
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, field)| field.required)
            .map(|(name, _)| name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How the platform treats a failed step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPolicy {
    /// Keep running the workflow after this step fails
    #[serde(default)]
    pub continue_on_error: bool,

    /// Retry this step when it fails
    #[serde(default)]
    pub retry_on_error: bool,
}

impl ErrorPolicy {
    /// Halt on first failure, no retries
    pub const STRICT: Self = Self {
        continue_on_error: false,
        retry_on_error: false,
    };

    /// Retry failures, halt when retries are exhausted
    pub const RETRY: Self = Self {
        continue_on_error: false,
        retry_on_error: true,
    };
}

/// Static description of an action or trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    /// Display name
    pub name: String,

    /// What the unit does
    pub description: String,

    /// Input parameters
    #[serde(default)]
    pub input_schema: InputSchema,

    /// Example output, documentation only
    #[serde(default)]
    pub sample_output: Value,

    /// Failure handling hints for the platform
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Whether resolved credentials must be supplied
    #[serde(default)]
    pub requires_auth: bool,
}

impl OperationInfo {
    /// Create a descriptor with no inputs and an empty sample output
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::default(),
            sample_output: Value::Object(Default::default()),
            error_policy: ErrorPolicy::default(),
            requires_auth: false,
        }
    }

    /// Set the input schema
    pub fn with_input(mut self, schema: InputSchema) -> Self {
        self.input_schema = schema;
        self
    }

    /// Set the sample output
    pub fn with_sample_output(mut self, sample: Value) -> Self {
        self.sample_output = sample;
        self
    }

    /// Set the error policy
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Require resolved credentials
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}
