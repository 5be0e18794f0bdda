//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use agrosphere_config::{
    Config, ConversationalBackend, HealthConfig, HttpEndpointConfig, ServerConfig, StructuredBackend,
};
use agrosphere_core::ProviderFamily;
use url::Url;

/// Builder for constructing test configurations
///
/// Both providers start disabled; tests opt in to the ones they need.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                health: HealthConfig {
                    enabled: true,
                    ..HealthConfig::default()
                },
            },
            ..Config::default()
        };
        config.providers.structured.enabled = false;
        config.providers.conversational.enabled = false;

        Self { config }
    }

    /// Point the structured predictor at a mock endpoint
    pub fn with_structured_endpoint(mut self, url: &str) -> Self {
        self.config.providers.structured.enabled = true;
        self.config.providers.structured.backend = StructuredBackend::Http(endpoint(url, None));
        self
    }

    /// Point the conversational model at a mock endpoint
    pub fn with_conversational_endpoint(mut self, url: &str, model: &str) -> Self {
        self.config.providers.conversational.enabled = true;
        self.config.providers.conversational.backend =
            ConversationalBackend::Http(endpoint(url, Some(model.to_owned())));
        self
    }

    /// Keep the endpoint configured but switch the structured predictor off
    pub fn disable_structured(mut self) -> Self {
        self.config.providers.structured.enabled = false;
        self
    }

    /// Keep the endpoint configured but switch the conversational model off
    pub fn disable_conversational(mut self) -> Self {
        self.config.providers.conversational.enabled = false;
        self
    }

    /// Try `alternate` once when the primary for `primary` fails
    pub fn with_alternate(mut self, primary: ProviderFamily, alternate: ProviderFamily) -> Self {
        match primary {
            ProviderFamily::StructuredPrediction => self.config.fallback.structured_alternate = Some(alternate),
            ProviderFamily::Conversational => self.config.fallback.conversational_alternate = Some(alternate),
        }
        self
    }

    /// Set the static offline reply
    pub fn with_offline_reply(mut self, reply: &str) -> Self {
        reply.clone_into(&mut self.config.fallback.offline_reply);
        self
    }

    /// Set the per-provider timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.dispatch.timeout = timeout;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}

fn endpoint(url: &str, model: Option<String>) -> HttpEndpointConfig {
    HttpEndpointConfig {
        url: Url::parse(url).expect("valid URL"),
        api_key: None,
        model,
    }
}
