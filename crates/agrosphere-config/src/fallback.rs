use agrosphere_core::ProviderFamily;
use serde::Deserialize;

/// Recovery order applied after a provider failure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackConfig {
    /// Provider tried once when the structured predictor fails
    #[serde(default)]
    pub structured_alternate: Option<ProviderFamily>,
    /// Provider tried once when the conversational model fails
    #[serde(default)]
    pub conversational_alternate: Option<ProviderFamily>,
    /// Static agronomic tip returned when no provider answers
    #[serde(default = "default_offline_reply")]
    pub offline_reply: String,
}

impl FallbackConfig {
    /// Configured alternate for a primary family
    pub const fn alternate_for(&self, primary: ProviderFamily) -> Option<ProviderFamily> {
        match primary {
            ProviderFamily::StructuredPrediction => self.structured_alternate,
            ProviderFamily::Conversational => self.conversational_alternate,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            structured_alternate: None,
            conversational_alternate: None,
            offline_reply: default_offline_reply(),
        }
    }
}

fn default_offline_reply() -> String {
    "Your soil moisture looks good today! No irrigation needed. \
     Keep soil pH between 6.5 and 7.5 and work in compost before sowing."
        .to_owned()
}
