//! Webhook integration

mod catch;
mod send;

use std::sync::Arc;
use std::time::Duration;
use tether_core::{
    Action, AuthKind, AuthRequirement, Error, Integration, IntegrationMetadata, Result, Trigger,
};

pub use catch::Catch;
pub use send::SendRequest;

const DESCRIPTOR: &str = include_str!("integration.yaml");
const DOCUMENTATION: &str = include_str!("README.md");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Integration for generic HTTP webhooks
pub struct WebhookIntegration {
    metadata: IntegrationMetadata,
    send: Arc<SendRequest>,
    catch: Arc<Catch>,
}

impl WebhookIntegration {
    /// Parse the bundled descriptor, build the HTTP client and the units
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::upstream("webhook", e))?;

        Ok(Self {
            metadata: IntegrationMetadata::from_descriptor(DESCRIPTOR, DOCUMENTATION)?,
            send: Arc::new(SendRequest::new(client)),
            catch: Arc::new(Catch::new()),
        })
    }
}

impl Integration for WebhookIntegration {
    fn id(&self) -> &str {
        "webhook"
    }

    fn metadata(&self) -> &IntegrationMetadata {
        &self.metadata
    }

    fn auth(&self) -> AuthRequirement {
        AuthRequirement::required(AuthKind::Bearer)
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        vec![self.send.clone() as Arc<dyn Action>]
    }

    fn triggers(&self) -> Vec<Arc<dyn Trigger>> {
        vec![self.catch.clone() as Arc<dyn Trigger>]
    }
}
