//! AWS SageMaker runtime adapter for the structured predictor

use std::time::Duration;

use agrosphere_config::SagemakerConfig;
use agrosphere_core::{InferenceRequest, ProviderFamily};
use async_trait::async_trait;
use aws_sdk_sagemakerruntime::Client as SagemakerClient;
use aws_smithy_types::Blob;

use super::{Provider, RawProviderResult, payload};
use crate::error::ProviderError;

/// Structured predictor hosted on a SageMaker real-time endpoint
pub struct SagemakerProvider {
    endpoint_name: String,
    client: SagemakerClient,
}

impl SagemakerProvider {
    /// Build the runtime client for the configured endpoint
    pub async fn new(config: &SagemakerConfig) -> Self {
        let sdk_config = super::load_aws_config(
            &config.region,
            config.access_key_id.as_ref(),
            config.secret_access_key.as_ref(),
        )
        .await;

        Self {
            endpoint_name: config.endpoint_name.clone(),
            client: SagemakerClient::new(&sdk_config),
        }
    }
}

#[async_trait]
impl Provider for SagemakerProvider {
    fn name(&self) -> &str {
        &self.endpoint_name
    }

    fn family(&self) -> ProviderFamily {
        ProviderFamily::StructuredPrediction
    }

    async fn invoke(&self, request: &InferenceRequest, timeout: Duration) -> Result<RawProviderResult, ProviderError> {
        let body = payload::structured_body(request.readings())?;

        let call = self
            .client
            .invoke_endpoint()
            .endpoint_name(&self.endpoint_name)
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
                    provider = %self.endpoint_name,
                    error = %e,
                    "sagemaker invoke_endpoint failed"
                );
                super::sdk_failure(status, e.to_string())
            })?;

        Ok(RawProviderResult {
            body: output.body.map(Blob::into_inner).unwrap_or_default(),
            content_type: output.content_type,
        })
    }
}
