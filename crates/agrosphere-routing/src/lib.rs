//! Routing decisions for the AgroSphere gateway
//!
//! Two pieces, both pure and synchronous:
//! - **Classifier**: picks the provider family for a request
//! - **Fallback chain**: decides what to do after a provider attempt fails

#![allow(clippy::must_use_candidate)]

pub mod classifier;
pub mod fallback;

use std::fmt;

use agrosphere_core::{ProviderFamily, SensorField};

pub use classifier::{STRUCTURED_KEYWORDS, classify};
pub use fallback::{AttemptKind, FallbackAction, FallbackChain};

/// Why a request was sent to the structured predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredEvidence {
    /// The request carried this numeric reading
    SensorField(SensorField),
    /// The query text contained this keyword
    Keyword(&'static str),
}

/// Result of classifying a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Route to the numeric predictor
    StructuredPrediction { evidence: StructuredEvidence },
    /// Route to the language model; nothing structured was found
    Conversational,
}

impl RoutingDecision {
    /// Provider family the request is routed to
    pub const fn family(&self) -> ProviderFamily {
        match self {
            Self::StructuredPrediction { .. } => ProviderFamily::StructuredPrediction,
            Self::Conversational => ProviderFamily::Conversational,
        }
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuredPrediction {
                evidence: StructuredEvidence::SensorField(field),
            } => write!(f, "structured_prediction (field: {field})"),
            Self::StructuredPrediction {
                evidence: StructuredEvidence::Keyword(keyword),
            } => write!(f, "structured_prediction (keyword: {keyword})"),
            Self::Conversational => f.write_str("conversational (no structured trigger)"),
        }
    }
}
