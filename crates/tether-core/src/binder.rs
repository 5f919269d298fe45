//! Typed input binding
//!
//! Converts the untyped input payload of a step into a unit's parameter
//! struct. The binder is built from the unit's [`InputSchema`], so the
//! schema's `required` flags and `default` values are the single source of
//! truth for required-ness.
//!
//! Decoding is plain serde: no coercion between incompatible kinds, so a
//! string field given a number fails.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use crate::schema::{InputSchema, OperationInfo};

/// How strictly a payload is bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BindMode {
    /// Missing required fields and decode failures are errors
    #[default]
    Strict,
    /// Required fields are not checked; decode failures yield nothing
    Permissive,
}

/// Binds payloads against one operation's input schema
#[derive(Debug, Clone, Copy)]
pub struct InputBinder<'a> {
    operation: &'a str,
    schema: &'a InputSchema,
}

impl<'a> InputBinder<'a> {
    /// Binder for `schema`, reporting errors against `operation`
    pub fn new(operation: &'a str, schema: &'a InputSchema) -> Self {
        Self { operation, schema }
    }

    /// Binder for the descriptor's schema, reporting errors against the unit id
    pub fn for_operation(operation: &'a str, info: &'a OperationInfo) -> Self {
        Self::new(operation, &info.input_schema)
    }

    /// Apply schema defaults and, in strict mode, check required fields
    pub fn prepare(&self, payload: &Value, mode: BindMode) -> Result<Map<String, Value>> {
        let mut fields = match payload {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => {
                return Err(Error::binding(self.operation, "input is not a JSON object"));
            }
        };

        for (name, field) in self.schema.iter() {
            let missing = fields.get(name).is_none_or(Value::is_null);
            if !missing {
                continue;
            }
            if let Some(default) = &field.default {
                fields.insert(name.to_string(), default.clone());
            } else if field.required && mode == BindMode::Strict {
                return Err(Error::binding(
                    self.operation,
                    format!("missing required field '{}'", name),
                ));
            }
        }

        Ok(fields)
    }

    /// Strictly bind `payload` into `T`
    pub fn bind<T: DeserializeOwned>(&self, payload: &Value) -> Result<T> {
        let fields = self.prepare(payload, BindMode::Strict)?;
        tracing::debug!(operation = self.operation, fields = fields.len(), "binding input");
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| Error::binding(self.operation, e.to_string()))
    }

    /// Bind `payload` into `T`, returning `None` instead of failing
    pub fn bind_permissive<T: DeserializeOwned>(&self, payload: &Value) -> Option<T> {
        let decoded = self
            .prepare(payload, BindMode::Permissive)
            .and_then(|fields| {
                serde_json::from_value(Value::Object(fields))
                    .map_err(|e| Error::binding(self.operation, e.to_string()))
            });
        match decoded {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(
                    operation = self.operation,
                    error = %e,
                    "permissive bind discarded input"
                );
                None
            }
        }
    }

    /// Bind `payload` in the given mode
    ///
    /// Strict mode never returns `Ok(None)`.
    pub fn bind_with<T: DeserializeOwned>(
        &self,
        payload: &Value,
        mode: BindMode,
    ) -> Result<Option<T>> {
        match mode {
            BindMode::Strict => self.bind(payload).map(Some),
            BindMode::Permissive => Ok(self.bind_permissive(payload)),
        }
    }
}

impl ExecutionContext {
    /// Strictly bind the current step's input against `info`'s schema
    ///
    /// Errors name `operation`, the unit id, rather than the display name.
    pub fn bind_input<T: DeserializeOwned>(
        &self,
        operation: &str,
        info: &OperationInfo,
    ) -> Result<T> {
        InputBinder::for_operation(operation, info).bind(self.current_input()?)
    }
}
