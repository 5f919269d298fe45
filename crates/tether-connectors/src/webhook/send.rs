//! Outbound webhook action

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tether_core::{
    Action, Error, ErrorPolicy, ExecutionContext, FieldDescriptor, InputSchema, OperationInfo,
    Output, Result, to_output,
};

/// Methods offered by the `method` select field
const METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

#[derive(Debug, Deserialize)]
struct SendParams {
    url: String,
    method: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Value,
}

/// A validated request, ready to send
#[derive(Debug)]
struct PreparedRequest {
    method: Method,
    url: Url,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Value,
}

/// Sends a JSON request with a bearer token
pub struct SendRequest {
    info: OperationInfo,
    client: reqwest::Client,
}

impl SendRequest {
    pub(super) fn new(client: reqwest::Client) -> Self {
        Self {
            info: OperationInfo::new("Send request", "Send a JSON request to a URL")
                .with_input(
                    InputSchema::new()
                        .field("url", FieldDescriptor::short_text("URL").required())
                        .field(
                            "method",
                            FieldDescriptor::select("Method", METHODS).with_default("POST"),
                        )
                        .field(
                            "headers",
                            FieldDescriptor::code("Headers", "json").with_default(json!({})),
                        )
                        .field("body", FieldDescriptor::code("Body", "json")),
                )
                .with_sample_output(json!({"status": 200, "body": {"ok": true}}))
                .with_error_policy(ErrorPolicy::RETRY)
                .requires_auth(),
            client,
        }
    }

    /// Check auth, bind input and validate the request without sending it
    fn prepare<'a>(&self, ctx: &'a ExecutionContext) -> Result<(&'a str, PreparedRequest)> {
        let token = ctx.auth().require_token(self.id())?;
        let params: SendParams = ctx.bind_input(self.id(), &self.info)?;

        let upper = params.method.to_ascii_uppercase();
        if !METHODS.contains(&upper.as_str()) {
            return Err(Error::binding(
                self.id(),
                format!(
                    "invalid method '{}', expected one of {}",
                    params.method,
                    METHODS.join(", ")
                ),
            ));
        }
        let method = Method::from_bytes(upper.as_bytes())
            .map_err(|_| Error::binding(self.id(), format!("invalid method '{}'", params.method)))?;

        let url = Url::parse(&params.url).map_err(|e| {
            Error::binding(self.id(), format!("invalid url '{}': {}", params.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::binding(
                self.id(),
                format!("unsupported url scheme '{}'", url.scheme()),
            ));
        }

        let headers = params
            .headers
            .into_iter()
            .map(|(name, value)| -> Result<(HeaderName, HeaderValue)> {
                let header = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                    Error::binding(self.id(), format!("invalid header name '{}'", name))
                })?;
                let value = HeaderValue::from_str(&value).map_err(|_| {
                    Error::binding(self.id(), format!("invalid value for header '{}'", name))
                })?;
                Ok((header, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((
            token,
            PreparedRequest {
                method,
                url,
                headers,
                body: params.body,
            },
        ))
    }
}

#[async_trait]
impl Action for SendRequest {
    fn id(&self) -> &str {
        "send"
    }

    fn info(&self) -> &OperationInfo {
        &self.info
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Output> {
        let (token, request) = self.prepare(ctx)?;
        tracing::info!(method = %request.method, url = %request.url, "sending webhook");

        let mut builder = self
            .client
            .request(request.method.clone(), request.url)
            .bearer_auth(token);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_null() && request.method != Method::GET {
            builder = builder.json(&request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::upstream(self.id(), e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::upstream(self.id(), e))?;

        if !status.is_success() {
            return Err(Error::upstream(
                self.id(),
                format!("HTTP {}: {}", status.as_u16(), text),
            ));
        }

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(to_output(json!({"status": status.as_u16(), "body": body})))
    }

    async fn test(&self, ctx: &ExecutionContext) -> Result<Output> {
        let (_, request) = self.prepare(ctx)?;
        tracing::debug!(url = %request.url, "test run, request not sent");
        Ok(to_output(self.info.sample_output.clone()))
    }
}
