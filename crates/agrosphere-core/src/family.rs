use std::fmt;

use serde::{Deserialize, Serialize};

/// The two kinds of upstream inference provider the gateway routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    /// Numeric sensor readings in, crop/irrigation prediction out
    #[serde(alias = "structured")]
    StructuredPrediction,
    /// Free-text agronomy questions answered by a language model
    Conversational,
}

impl ProviderFamily {
    /// Stable identifier used in logs, metrics and wire responses
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuredPrediction => "structured_prediction",
            Self::Conversational => "conversational",
        }
    }

    /// The opposite family
    pub const fn other(self) -> Self {
        match self {
            Self::StructuredPrediction => Self::Conversational,
            Self::Conversational => Self::StructuredPrediction,
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
