use std::path::Path;

use agrosphere_core::ProviderFamily;

use crate::{Config, ConversationalBackend, HttpEndpointConfig, StructuredBackend};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_dispatch()?;
        self.validate_structured()?;
        self.validate_conversational()?;
        self.validate_fallback()?;
        Ok(())
    }

    fn validate_dispatch(&self) -> anyhow::Result<()> {
        if self.dispatch.timeout.is_zero() {
            anyhow::bail!("dispatch.timeout must be greater than zero");
        }
        Ok(())
    }

    fn validate_structured(&self) -> anyhow::Result<()> {
        let structured = &self.providers.structured;

        if !(0.0..=1.0).contains(&structured.default_confidence) {
            anyhow::bail!("providers.structured.default_confidence must be between 0.0 and 1.0");
        }

        match &structured.backend {
            StructuredBackend::Sagemaker(sagemaker) => {
                if sagemaker.endpoint_name.trim().is_empty() {
                    anyhow::bail!("providers.structured.backend.endpoint_name must not be empty");
                }
                validate_credentials_pair(
                    "providers.structured.backend",
                    sagemaker.access_key_id.is_some(),
                    sagemaker.secret_access_key.is_some(),
                )?;
            }
            StructuredBackend::Http(http) => validate_http("providers.structured.backend", http)?,
        }

        Ok(())
    }

    fn validate_conversational(&self) -> anyhow::Result<()> {
        let conversational = &self.providers.conversational;

        if conversational.max_tokens == 0 {
            anyhow::bail!("providers.conversational.max_tokens must be greater than zero");
        }
        if !conversational.temperature.is_finite() || conversational.temperature < 0.0 {
            anyhow::bail!("providers.conversational.temperature must be a non-negative number");
        }
        if !(conversational.top_p > 0.0 && conversational.top_p <= 1.0) {
            anyhow::bail!("providers.conversational.top_p must be in (0.0, 1.0]");
        }

        match &conversational.backend {
            ConversationalBackend::Bedrock(bedrock) => {
                if bedrock.model_id.trim().is_empty() {
                    anyhow::bail!("providers.conversational.backend.model_id must not be empty");
                }
                validate_credentials_pair(
                    "providers.conversational.backend",
                    bedrock.access_key_id.is_some(),
                    bedrock.secret_access_key.is_some(),
                )?;
            }
            ConversationalBackend::Http(http) => validate_http("providers.conversational.backend", http)?,
        }

        Ok(())
    }

    fn validate_fallback(&self) -> anyhow::Result<()> {
        if self.fallback.offline_reply.trim().is_empty() {
            anyhow::bail!("fallback.offline_reply must not be empty");
        }

        for primary in [ProviderFamily::StructuredPrediction, ProviderFamily::Conversational] {
            if self.fallback.alternate_for(primary) == Some(primary) {
                anyhow::bail!("fallback alternate for {primary} must name the other provider family");
            }
        }

        Ok(())
    }
}

fn validate_http(section: &str, http: &HttpEndpointConfig) -> anyhow::Result<()> {
    if !matches!(http.url.scheme(), "http" | "https") {
        anyhow::bail!("{section}.url must use http or https, got '{}'", http.url.scheme());
    }
    Ok(())
}

fn validate_credentials_pair(section: &str, has_key_id: bool, has_secret: bool) -> anyhow::Result<()> {
    if has_key_id != has_secret {
        anyhow::bail!("{section} requires both access_key_id and secret_access_key, or neither");
    }
    Ok(())
}
