use serde::Serialize;

use crate::ProviderFamily;

/// Outcome class of a resolved request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// The primary provider answered
    Success,
    /// An alternate provider answered after the primary failed
    Degraded,
    /// No live provider answered; the static reply was used
    Offline,
}

impl ResultStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Degraded => "degraded",
            Self::Offline => "offline",
        }
    }
}

/// Which provider or fallback tier produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    StructuredPrediction,
    Conversational,
    Offline,
}

impl Origin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuredPrediction => "structured_prediction",
            Self::Conversational => "conversational",
            Self::Offline => "offline",
        }
    }
}

impl From<ProviderFamily> for Origin {
    fn from(family: ProviderFamily) -> Self {
        match family {
            ProviderFamily::StructuredPrediction => Self::StructuredPrediction,
            ProviderFamily::Conversational => Self::Conversational,
        }
    }
}

/// Where a confidence value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    /// Reported by the upstream provider
    Reported,
    /// Fixed stand-in used when the provider omits one; not a measurement
    Placeholder,
}

/// Confidence in the 0.0–1.0 range, labelled with its source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Confidence {
    value: f64,
    source: ConfidenceSource,
}

impl Confidence {
    /// A provider-reported value, or `None` if it is not within 0.0–1.0
    pub fn reported(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self {
            value,
            source: ConfidenceSource::Reported,
        })
    }

    /// A configured stand-in value, clamped into 0.0–1.0
    pub fn placeholder(value: f64) -> Self {
        let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            value,
            source: ConfidenceSource::Placeholder,
        }
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn source(&self) -> ConfidenceSource {
        self.source
    }
}

/// The single response shape returned for every resolved request
///
/// Fields are private: `status == Success` is only reachable through
/// [`CanonicalResult::from_provider`] and `status == Offline` only through
/// [`CanonicalResult::offline`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalResult {
    reply: String,
    origin: Origin,
    confidence: Option<Confidence>,
    status: ResultStatus,
    model_used: Option<String>,
}

impl CanonicalResult {
    /// Result produced by a live provider
    pub fn from_provider(
        family: ProviderFamily,
        model_used: impl Into<String>,
        reply: impl Into<String>,
        confidence: Option<Confidence>,
    ) -> Self {
        Self {
            reply: reply.into(),
            origin: family.into(),
            confidence,
            status: ResultStatus::Success,
            model_used: Some(model_used.into()),
        }
    }

    /// Static reply used when no provider answered
    pub fn offline(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            origin: Origin::Offline,
            confidence: None,
            status: ResultStatus::Offline,
            model_used: None,
        }
    }

    /// Mark a provider result as coming from an alternate provider
    ///
    /// Offline results are returned unchanged.
    #[must_use]
    pub fn into_degraded(mut self) -> Self {
        if self.status == ResultStatus::Success {
            self.status = ResultStatus::Degraded;
        }
        self
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub const fn origin(&self) -> Origin {
        self.origin
    }

    pub const fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub const fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn model_used(&self) -> Option<&str> {
        self.model_used.as_deref()
    }
}
