//! Provider trait and adapters for the two upstream families

pub mod bedrock;
pub mod http_endpoint;
pub mod payload;
pub mod sagemaker;

use std::sync::Arc;
use std::time::Duration;

use agrosphere_config::{ConversationalBackend, ProvidersConfig, StructuredBackend};
use agrosphere_core::{InferenceRequest, ProviderFamily};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ProviderError;

/// Raw body returned by a provider before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProviderResult {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl RawProviderResult {
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            content_type: Some("application/json".to_owned()),
        }
    }
}

/// Uniform invoke contract over one upstream endpoint
///
/// Implementations own their endpoint identity and request shape. Every
/// failure, including timeouts, comes back as a [`ProviderError`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Endpoint or model identity, reported as `model_used`
    fn name(&self) -> &str;

    /// Family this provider serves
    fn family(&self) -> ProviderFamily;

    /// Send one request upstream
    async fn invoke(&self, request: &InferenceRequest, timeout: Duration) -> Result<RawProviderResult, ProviderError>;
}

/// The provider handle for each family, built once at startup
///
/// A family whose provider is disabled in configuration has no handle.
#[derive(Clone, Default)]
pub struct ProviderSet {
    structured: Option<Arc<dyn Provider>>,
    conversational: Option<Arc<dyn Provider>>,
}

impl ProviderSet {
    /// Build provider clients from configuration
    ///
    /// AWS clients resolve credentials and region here, so this must run
    /// inside the async runtime.
    pub async fn from_config(config: &ProvidersConfig) -> anyhow::Result<Self> {
        let mut set = Self::default();

        if config.structured.enabled {
            let provider: Arc<dyn Provider> = match &config.structured.backend {
                StructuredBackend::Sagemaker(sagemaker) => {
                    Arc::new(sagemaker::SagemakerProvider::new(sagemaker).await)
                }
                StructuredBackend::Http(endpoint) => Arc::new(http_endpoint::HttpProvider::structured(endpoint)?),
            };
            tracing::info!(provider = provider.name(), "structured prediction provider ready");
            set.structured = Some(provider);
        } else {
            tracing::info!("structured prediction provider disabled");
        }

        if config.conversational.enabled {
            let conversational = &config.conversational;
            let provider: Arc<dyn Provider> = match &conversational.backend {
                ConversationalBackend::Bedrock(bedrock) => {
                    Arc::new(bedrock::BedrockProvider::new(bedrock, conversational).await)
                }
                ConversationalBackend::Http(endpoint) => {
                    Arc::new(http_endpoint::HttpProvider::conversational(endpoint, conversational)?)
                }
            };
            tracing::info!(provider = provider.name(), "conversational provider ready");
            set.conversational = Some(provider);
        } else {
            tracing::info!("conversational provider disabled");
        }

        Ok(set)
    }

    /// Register a provider under its own family, replacing any previous one
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        match provider.family() {
            ProviderFamily::StructuredPrediction => self.structured = Some(provider),
            ProviderFamily::Conversational => self.conversational = Some(provider),
        }
        self
    }

    /// Provider for a family, if enabled
    pub fn get(&self, family: ProviderFamily) -> Option<&Arc<dyn Provider>> {
        match family {
            ProviderFamily::StructuredPrediction => self.structured.as_ref(),
            ProviderFamily::Conversational => self.conversational.as_ref(),
        }
    }
}

/// Static AWS credentials when both halves are configured
fn static_credentials(
    access_key_id: Option<&SecretString>,
    secret_access_key: Option<&SecretString>,
) -> Option<aws_credential_types::Credentials> {
    let (access_key, secret_key) = access_key_id.zip(secret_access_key)?;

    Some(aws_credential_types::Credentials::new(
        access_key.expose_secret(),
        secret_key.expose_secret(),
        None,
        None,
        "agrosphere-config",
    ))
}

/// Shared AWS SDK configuration for one region
async fn load_aws_config(
    region: &str,
    access_key_id: Option<&SecretString>,
    secret_access_key: Option<&SecretString>,
) -> aws_config::SdkConfig {
    let mut builder =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(aws_config::Region::new(region.to_owned()));

    // Explicit keys win; otherwise the default provider chain applies
    if let Some(credentials) = static_credentials(access_key_id, secret_access_key) {
        builder = builder.credentials_provider(credentials);
    }

    builder.load().await
}

/// Map an AWS SDK failure onto the provider error taxonomy
///
/// A failure that carries an HTTP response is an upstream error; anything
/// without one (DNS, TLS, credential resolution) is transport.
fn sdk_failure(status: Option<u16>, message: String) -> ProviderError {
    match status {
        Some(status) => ProviderError::Upstream { status, body: message },
        None => ProviderError::Transport(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(ProviderFamily);

    #[async_trait]
    impl Provider for Named {
        fn name(&self) -> &str {
            "named"
        }

        fn family(&self) -> ProviderFamily {
            self.0
        }

        async fn invoke(&self, _: &InferenceRequest, _: Duration) -> Result<RawProviderResult, ProviderError> {
            Err(ProviderError::Disabled)
        }
    }

    #[test]
    fn providers_register_under_their_family() {
        let set = ProviderSet::default().with_provider(Arc::new(Named(ProviderFamily::Conversational)));

        assert!(set.get(ProviderFamily::Conversational).is_some());
        assert!(set.get(ProviderFamily::StructuredPrediction).is_none());
    }

    #[test]
    fn credentials_need_both_halves() {
        let key = SecretString::from("AKIDEXAMPLE");
        let secret = SecretString::from("wJalrXUtnFEMI");

        assert!(static_credentials(Some(&key), Some(&secret)).is_some());
        assert!(static_credentials(Some(&key), None).is_none());
        assert!(static_credentials(None, None).is_none());
    }

    #[test]
    fn sdk_failures_with_a_status_are_upstream() {
        assert_eq!(
            sdk_failure(Some(424), "model error".to_owned()),
            ProviderError::Upstream {
                status: 424,
                body: "model error".to_owned()
            }
        );
        assert_eq!(
            sdk_failure(None, "dispatch failure".to_owned()),
            ProviderError::Transport("dispatch failure".to_owned())
        );
    }

    #[tokio::test]
    async fn disabled_families_get_no_handle() {
        let mut config = ProvidersConfig::default();
        config.structured.enabled = false;
        config.conversational.enabled = false;

        let set = ProviderSet::from_config(&config).await.unwrap();
        assert!(set.get(ProviderFamily::StructuredPrediction).is_none());
        assert!(set.get(ProviderFamily::Conversational).is_none());
    }
}
