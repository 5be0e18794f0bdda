//! Response normalization
//!
//! Turns a raw provider body into a [`CanonicalResult`]. Normalization
//! never fails: when the expected field is missing, or the body is not
//! JSON at all, the whole body becomes the reply text.
//!
//! A structured confidence between 1 and 100 is read as a percentage. Any
//! other value outside 0.0–1.0 is dropped; the configured placeholder only
//! stands in when the predictor sends no number at all.

use agrosphere_core::{CanonicalResult, Confidence, ProviderFamily};
use serde_json::Value;

use crate::provider::RawProviderResult;

/// Text fields checked, in order, on a conversational response
const CONVERSATIONAL_TEXT_FIELDS: [&str; 3] = ["completion", "outputText", "reply"];

/// Maps provider bodies onto the canonical result shape
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    default_confidence: f64,
}

impl Normalizer {
    /// `default_confidence` is reported, labelled as a placeholder, when the
    /// structured predictor omits its own
    pub const fn new(default_confidence: f64) -> Self {
        Self { default_confidence }
    }

    /// Normalize a successful provider response
    pub fn normalize(&self, family: ProviderFamily, model_used: &str, raw: &RawProviderResult) -> CanonicalResult {
        let json = is_json(raw)
            .then(|| serde_json::from_slice::<Value>(&raw.body).ok())
            .flatten();

        match family {
            ProviderFamily::StructuredPrediction => {
                let reply = json
                    .as_ref()
                    .and_then(prediction_text)
                    .unwrap_or_else(|| whole_body(raw));

                let confidence = match json.as_ref().and_then(|v| v.get("confidence")).and_then(Value::as_f64) {
                    Some(value) => reported_confidence(value),
                    None => Some(Confidence::placeholder(self.default_confidence)),
                };

                CanonicalResult::from_provider(family, model_used, reply, confidence)
            }
            ProviderFamily::Conversational => {
                let reply = json
                    .as_ref()
                    .and_then(conversational_text)
                    .unwrap_or_else(|| whole_body(raw));

                CanonicalResult::from_provider(family, model_used, reply, None)
            }
        }
    }
}

/// Bodies without a content type are sniffed; a declared non-JSON type is taken at its word
fn is_json(raw: &RawProviderResult) -> bool {
    raw.content_type
        .as_deref()
        .is_none_or(|content_type| content_type.to_ascii_lowercase().contains("json"))
}

fn reported_confidence(value: f64) -> Option<Confidence> {
    if value > 1.0 && value <= 100.0 {
        Confidence::reported(value / 100.0)
    } else {
        Confidence::reported(value)
    }
}

fn prediction_text(json: &Value) -> Option<String> {
    let prediction = match json {
        Value::Object(map) => map.get("prediction")?,
        Value::String(_) => json,
        _ => return None,
    };

    let text = match prediction {
        Value::Null => return None,
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    };

    (!text.is_empty()).then_some(text)
}

fn conversational_text(json: &Value) -> Option<String> {
    CONVERSATIONAL_TEXT_FIELDS
        .iter()
        .filter_map(|field| json.get(field))
        .chain(json.pointer("/results/0/outputText"))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

fn whole_body(raw: &RawProviderResult) -> String {
    String::from_utf8_lossy(&raw.body).trim().to_owned()
}

#[cfg(test)]
mod tests {
    use agrosphere_core::{ConfidenceSource, Origin, ResultStatus};

    use super::*;

    const NORMALIZER: Normalizer = Normalizer::new(0.93);

    fn structured(body: &str) -> CanonicalResult {
        NORMALIZER.normalize(
            ProviderFamily::StructuredPrediction,
            "agrosphere-irrigation-endpoint-v2",
            &RawProviderResult::json(body),
        )
    }

    fn conversational(body: &str) -> CanonicalResult {
        NORMALIZER.normalize(
            ProviderFamily::Conversational,
            "anthropic.claude-instant-v1",
            &RawProviderResult::json(body),
        )
    }

    #[test]
    fn structured_prediction_with_reported_confidence() {
        let result = structured(r#"{"prediction": "Irrigate within 24 hours", "confidence": 0.87}"#);

        assert_eq!(result.reply(), "Irrigate within 24 hours");
        assert_eq!(result.origin(), Origin::StructuredPrediction);
        assert_eq!(result.status(), ResultStatus::Success);
        assert_eq!(result.model_used(), Some("agrosphere-irrigation-endpoint-v2"));

        let confidence = result.confidence().unwrap();
        assert!((confidence.value() - 0.87).abs() < f64::EPSILON);
        assert_eq!(confidence.source(), ConfidenceSource::Reported);
    }

    #[test]
    fn missing_confidence_uses_labelled_placeholder() {
        let result = structured(r#"{"prediction": "Healthy Crop"}"#);

        let confidence = result.confidence().unwrap();
        assert!((confidence.value() - 0.93).abs() < f64::EPSILON);
        assert_eq!(confidence.source(), ConfidenceSource::Placeholder);
    }

    #[test]
    fn percentage_confidence_is_scaled() {
        let result = structured(r#"{"prediction": "Healthy Crop", "confidence": 87}"#);

        let confidence = result.confidence().unwrap();
        assert!((confidence.value() - 0.87).abs() < 1e-9);
        assert_eq!(confidence.source(), ConfidenceSource::Reported);
    }

    #[test]
    fn unusable_confidence_is_left_out() {
        for body in [
            r#"{"prediction": "Healthy Crop", "confidence": 250}"#,
            r#"{"prediction": "Healthy Crop", "confidence": -0.2}"#,
        ] {
            assert!(structured(body).confidence().is_none(), "{body}");
        }
    }

    #[test]
    fn non_numeric_confidence_uses_placeholder() {
        let result = structured(r#"{"prediction": "Healthy Crop", "confidence": "high"}"#);
        assert_eq!(result.confidence().unwrap().source(), ConfidenceSource::Placeholder);
    }

    #[test]
    fn declared_text_body_is_not_parsed_as_json() {
        let raw = RawProviderResult {
            body: br#"{"completion": "Rotate crops."}"#.to_vec(),
            content_type: Some("text/plain; charset=utf-8".to_owned()),
        };
        let result = NORMALIZER.normalize(ProviderFamily::Conversational, "model", &raw);
        assert_eq!(result.reply(), r#"{"completion": "Rotate crops."}"#);
    }

    #[test]
    fn json_content_type_variants_are_parsed() {
        let raw = RawProviderResult {
            body: br#"{"completion": "Rotate crops."}"#.to_vec(),
            content_type: Some("Application/JSON; charset=utf-8".to_owned()),
        };
        let result = NORMALIZER.normalize(ProviderFamily::Conversational, "model", &raw);
        assert_eq!(result.reply(), "Rotate crops.");
    }

    #[test]
    fn non_string_prediction_is_rendered_as_json() {
        assert_eq!(structured(r#"{"prediction": 1}"#).reply(), "1");
        assert_eq!(
            structured(r#"{"prediction": {"irrigate": true}}"#).reply(),
            r#"{"irrigate":true}"#
        );
    }

    #[test]
    fn bare_string_body_is_the_prediction() {
        assert_eq!(structured(r#""Needs irrigation""#).reply(), "Needs irrigation");
    }

    #[test]
    fn structured_body_without_prediction_is_used_whole() {
        let result = structured(r#"{"label": "dry"}"#);
        assert_eq!(result.reply(), r#"{"label": "dry"}"#);
        assert_eq!(result.status(), ResultStatus::Success);
    }

    #[test]
    fn non_json_body_is_used_whole() {
        let result = structured("  dry soil, irrigate\n");
        assert_eq!(result.reply(), "dry soil, irrigate");
        assert_eq!(result.status(), ResultStatus::Success);
    }

    #[test]
    fn anthropic_completion() {
        let result = conversational(r#"{"completion": " Try millets or pulses.", "stop_reason": "stop_sequence"}"#);

        assert_eq!(result.reply(), "Try millets or pulses.");
        assert_eq!(result.origin(), Origin::Conversational);
        assert!(result.confidence().is_none());
    }

    #[test]
    fn titan_output_text() {
        let result = conversational(r#"{"outputText": "Try millets or pulses."}"#);

        assert_eq!(result.reply(), "Try millets or pulses.");
        assert_eq!(result.status(), ResultStatus::Success);
        assert!(result.confidence().is_none());
    }

    #[test]
    fn titan_results_array() {
        let result = conversational(r#"{"inputTextTokenCount": 12, "results": [{"outputText": "Sow after the first rains."}]}"#);
        assert_eq!(result.reply(), "Sow after the first rains.");
    }

    #[test]
    fn empty_completion_falls_through_to_next_field() {
        let result = conversational(r#"{"completion": "  ", "reply": "Use drip irrigation."}"#);
        assert_eq!(result.reply(), "Use drip irrigation.");
    }

    #[test]
    fn conversational_body_without_known_field_is_used_whole() {
        let result = conversational(r#"{"generated_text": "Rotate crops."}"#);
        assert_eq!(result.reply(), r#"{"generated_text": "Rotate crops."}"#);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let raw = RawProviderResult {
            body: vec![b'o', b'k', 0xFF],
            content_type: None,
        };
        let result = NORMALIZER.normalize(ProviderFamily::Conversational, "model", &raw);
        assert_eq!(result.reply(), "ok\u{FFFD}");
    }
}
