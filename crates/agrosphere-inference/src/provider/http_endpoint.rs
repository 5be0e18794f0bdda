//! Plain HTTP JSON adapter, usable for either family

use std::time::Duration;

use agrosphere_config::{ConversationalProviderConfig, HttpEndpointConfig};
use agrosphere_core::{InferenceRequest, ProviderFamily};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::payload::{self, GenerationParams, PromptShape};
use super::{Provider, RawProviderResult};
use crate::error::ProviderError;

enum BodyKind {
    Structured,
    Conversational { shape: PromptShape, params: GenerationParams },
}

/// Provider reached by POSTing JSON to a URL
pub struct HttpProvider {
    name: String,
    client: Client,
    url: Url,
    api_key: Option<SecretString>,
    body: BodyKind,
}

impl HttpProvider {
    /// Structured predictor behind an HTTP endpoint
    pub fn structured(config: &HttpEndpointConfig) -> anyhow::Result<Self> {
        Self::new(config, BodyKind::Structured)
    }

    /// Conversational model behind an HTTP endpoint
    ///
    /// The configured `model` picks the prompt shape; without one the
    /// generic shape is used.
    pub fn conversational(
        config: &HttpEndpointConfig,
        generation: &ConversationalProviderConfig,
    ) -> anyhow::Result<Self> {
        let shape = PromptShape::for_model(config.model.as_deref().unwrap_or_default());
        Self::new(
            config,
            BodyKind::Conversational {
                shape,
                params: generation.into(),
            },
        )
    }

    fn new(config: &HttpEndpointConfig, body: BodyKind) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        let name = config.model.clone().unwrap_or_else(|| config.url.to_string());

        Ok(Self {
            name,
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            body,
        })
    }

    fn encode(&self, request: &InferenceRequest) -> Result<Vec<u8>, ProviderError> {
        match &self.body {
            BodyKind::Structured => payload::structured_body(request.readings()),
            BodyKind::Conversational { shape, params } => {
                let question = payload::compose_question(request)?;
                serde_json::to_vec(&payload::conversational_body(*shape, params, &question))
                    .map_err(|e| ProviderError::Transport(format!("failed to encode prompt: {e}")))
            }
        }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> ProviderFamily {
        match self.body {
            BodyKind::Structured => ProviderFamily::StructuredPrediction,
            BodyKind::Conversational { .. } => ProviderFamily::Conversational,
        }
    }

    async fn invoke(&self, request: &InferenceRequest, timeout: Duration) -> Result<RawProviderResult, ProviderError> {
        let body = self.encode(request)?;

        let mut builder = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(body);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "upstream request failed");
            if e.is_timeout() {
                ProviderError::Timeout { after: timeout }
            } else {
                ProviderError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = %self.name, status = %status, "upstream returned error");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout { after: timeout }
            } else {
                ProviderError::Transport(format!("failed to read response body: {e}"))
            }
        })?;

        Ok(RawProviderResult {
            body: body.to_vec(),
            content_type,
        })
    }
}
