//! AWS Bedrock adapter for the conversational model, using `InvokeModel`

use std::time::Duration;

use agrosphere_config::{BedrockConfig, ConversationalProviderConfig};
use agrosphere_core::{InferenceRequest, ProviderFamily};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_smithy_types::Blob;

use super::payload::{self, GenerationParams, PromptShape};
use super::{Provider, RawProviderResult};
use crate::error::ProviderError;

/// Conversational model served by Bedrock
pub struct BedrockProvider {
    model_id: String,
    shape: PromptShape,
    params: GenerationParams,
    client: BedrockClient,
}

impl BedrockProvider {
    /// Build the runtime client for the configured model
    pub async fn new(config: &BedrockConfig, generation: &ConversationalProviderConfig) -> Self {
        let sdk_config = super::load_aws_config(
            &config.region,
            config.access_key_id.as_ref(),
            config.secret_access_key.as_ref(),
        )
        .await;

        Self {
            model_id: config.model_id.clone(),
            shape: PromptShape::for_model(&config.model_id),
            params: generation.into(),
            client: BedrockClient::new(&sdk_config),
        }
    }
}

#[async_trait]
impl Provider for BedrockProvider {
    fn name(&self) -> &str {
        &self.model_id
    }

    fn family(&self) -> ProviderFamily {
        ProviderFamily::Conversational
    }

    async fn invoke(&self, request: &InferenceRequest, timeout: Duration) -> Result<RawProviderResult, ProviderError> {
        let question = payload::compose_question(request)?;
        let body = payload::conversational_body(self.shape, &self.params, &question);
        let body = serde_json::to_vec(&body)
            .map_err(|e| ProviderError::Transport(format!("failed to encode prompt: {e}")))?;

        let call = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send();

        let output = tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout { after: timeout })?
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                tracing::error!(
                    provider = %self.model_id,
                    error = %e,
                    "bedrock invoke_model failed"
                );
                super::sdk_failure(status, e.to_string())
            })?;

        Ok(RawProviderResult {
            body: output.body.into_inner(),
            content_type: Some(output.content_type),
        })
    }
}
