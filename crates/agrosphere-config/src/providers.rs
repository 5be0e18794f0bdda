use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Default SageMaker deployment slot for the structured predictor
pub const DEFAULT_SAGEMAKER_ENDPOINT: &str = "agrosphere-irrigation-endpoint-v2";

/// Default Bedrock model for the conversational provider
pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-instant-v1";

/// Default AWS region for both providers
pub const DEFAULT_REGION: &str = "us-east-1";

/// Both upstream provider families
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Numeric sensor-reading predictor
    #[serde(default)]
    pub structured: StructuredProviderConfig,
    /// Language-model advisor
    #[serde(default)]
    pub conversational: ConversationalProviderConfig,
}

/// Structured-prediction provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredProviderConfig {
    /// Whether requests may be sent to this provider
    #[serde(default = "default_enabled", deserialize_with = "deserialize_toggle")]
    pub enabled: bool,
    /// Stand-in confidence reported when the model omits one
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,
    /// Where the model is hosted
    #[serde(default)]
    pub backend: StructuredBackend,
}

impl Default for StructuredProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_confidence: default_confidence(),
            backend: StructuredBackend::default(),
        }
    }
}

/// Hosting options for the structured predictor
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredBackend {
    /// AWS SageMaker real-time endpoint
    Sagemaker(SagemakerConfig),
    /// Any HTTP service accepting the sensor JSON body
    Http(HttpEndpointConfig),
}

impl Default for StructuredBackend {
    fn default() -> Self {
        Self::Sagemaker(SagemakerConfig::default())
    }
}

/// AWS SageMaker runtime endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SagemakerConfig {
    /// Endpoint name to invoke
    #[serde(default = "default_sagemaker_endpoint")]
    pub endpoint_name: String,
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID (optional, uses default credential chain if absent)
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
}

impl Default for SagemakerConfig {
    fn default() -> Self {
        Self {
            endpoint_name: default_sagemaker_endpoint(),
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

/// Conversational provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationalProviderConfig {
    /// Whether requests may be sent to this provider
    #[serde(default = "default_enabled", deserialize_with = "deserialize_toggle")]
    pub enabled: bool,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Persona prepended to every user question
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Where the model is hosted
    #[serde(default)]
    pub backend: ConversationalBackend,
}

impl Default for ConversationalProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            system_prompt: default_system_prompt(),
            backend: ConversationalBackend::default(),
        }
    }
}

/// Hosting options for the conversational model
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationalBackend {
    /// AWS Bedrock `InvokeModel`
    Bedrock(BedrockConfig),
    /// Any HTTP service accepting the prompt JSON body
    Http(HttpEndpointConfig),
}

impl Default for ConversationalBackend {
    fn default() -> Self {
        Self::Bedrock(BedrockConfig::default())
    }
}

/// AWS Bedrock-specific configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedrockConfig {
    /// Foundation model identifier
    #[serde(default = "default_bedrock_model")]
    pub model_id: String,
    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID (optional, uses default credential chain if absent)
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            model_id: default_bedrock_model(),
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

/// Plain HTTP JSON endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpEndpointConfig {
    /// URL receiving the POSTed request body
    pub url: Url,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Model identifier, used to pick the prompt body shape
    #[serde(default)]
    pub model: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

/// Provider switch as written in TOML, often pasted in from the environment
#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle {
    Flag(bool),
    Text(String),
    Number(i64),
}

/// Only `true`, in any letter case, switches a provider on
fn deserialize_toggle<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Toggle::deserialize(deserializer)? {
        Toggle::Flag(flag) => flag,
        Toggle::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        Toggle::Number(_) => false,
    })
}

#[allow(clippy::missing_const_for_fn)]
fn default_confidence() -> f64 {
    0.93
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_tokens() -> u32 {
    350
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    0.8
}

#[allow(clippy::missing_const_for_fn)]
fn default_top_p() -> f64 {
    0.9
}

fn default_region() -> String {
    DEFAULT_REGION.to_owned()
}

fn default_sagemaker_endpoint() -> String {
    DEFAULT_SAGEMAKER_ENDPOINT.to_owned()
}

fn default_bedrock_model() -> String {
    DEFAULT_BEDROCK_MODEL.to_owned()
}

fn default_system_prompt() -> String {
    "You are Krishi AI Advisor, a friendly agriculture expert helping Indian farmers. \
     Give short, clear and practical farming tips in three to five lines. \
     Use a simple, empathetic tone like a local agriculture officer. \
     Avoid disclaimers and long paragraphs."
        .to_owned()
}
