//! Query classification
//!
//! A single deterministic rule: any numeric reading, or any structured
//! keyword in the query text, routes to the structured predictor.
//! Readings are checked first, so they win regardless of the text.

use agrosphere_core::InferenceRequest;

use crate::{RoutingDecision, StructuredEvidence};

/// Keywords that send free text to the structured predictor
///
/// Matched case-insensitively as plain substrings.
pub const STRUCTURED_KEYWORDS: [&str; 5] = ["temperature", "humidity", "moisture", "ph", "irrigation"];

/// Classify a request
pub fn classify(request: &InferenceRequest) -> RoutingDecision {
    if let Some((field, _)) = request.readings().present().next() {
        return RoutingDecision::StructuredPrediction {
            evidence: StructuredEvidence::SensorField(field),
        };
    }

    request
        .query()
        .and_then(matching_keyword)
        .map_or(RoutingDecision::Conversational, |keyword| {
            RoutingDecision::StructuredPrediction {
                evidence: StructuredEvidence::Keyword(keyword),
            }
        })
}

fn matching_keyword(query: &str) -> Option<&'static str> {
    let lower = query.to_lowercase();
    STRUCTURED_KEYWORDS
        .into_iter()
        .find(|keyword| lower.contains(keyword))
}
