//! Request bodies sent upstream
//!
//! The structured predictor receives exactly the readings present on the
//! request. The conversational model receives a composed prompt in the
//! body shape its model family expects.

use std::fmt::Write as _;

use agrosphere_config::ConversationalProviderConfig;
use agrosphere_core::{InferenceRequest, SensorReadings};
use serde_json::{Value, json};

use crate::error::ProviderError;

/// JSON body for the structured predictor
///
/// Absent readings are omitted rather than filled in.
pub fn structured_body(readings: &SensorReadings) -> Result<Vec<u8>, ProviderError> {
    if readings.is_empty() {
        return Err(ProviderError::MissingInput("sensor readings"));
    }

    serde_json::to_vec(readings).map_err(|e| ProviderError::Transport(format!("failed to encode readings: {e}")))
}

/// Body layout expected by a conversational model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptShape {
    /// Anthropic text completion: `prompt` + `max_tokens_to_sample`
    AnthropicText,
    /// Amazon Titan text: `inputText` + `textGenerationConfig`
    TitanText,
    /// `prompt` + `max_tokens`
    Generic,
}

impl PromptShape {
    /// Pick the shape from a model identifier
    pub fn for_model(model_id: &str) -> Self {
        if model_id.starts_with("anthropic.") {
            Self::AnthropicText
        } else if model_id.starts_with("amazon.titan") {
            Self::TitanText
        } else {
            Self::Generic
        }
    }
}

/// Generation settings for the conversational model
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl From<&ConversationalProviderConfig> for GenerationParams {
    fn from(config: &ConversationalProviderConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// The question put to the conversational model
///
/// Query text when present. A readings-only request (reached through the
/// fallback chain) is phrased as a question about those readings.
pub fn compose_question(request: &InferenceRequest) -> Result<String, ProviderError> {
    if let Some(query) = request.query() {
        return Ok(query.to_owned());
    }

    if !request.has_readings() {
        return Err(ProviderError::MissingInput("query text"));
    }

    let mut question = String::from("My field sensors report");
    for (index, (field, value)) in request.readings().present().enumerate() {
        let separator = if index == 0 { " " } else { ", " };
        let _ = write!(question, "{separator}{field} {value}");
    }
    question.push_str(". What should I do for my crop today?");
    Ok(question)
}

/// JSON body for the conversational model
pub fn conversational_body(shape: PromptShape, params: &GenerationParams, question: &str) -> Value {
    let system = params.system_prompt.trim();

    match shape {
        PromptShape::AnthropicText => json!({
            "prompt": format!("\n\nHuman: {system}\n\n{question}\n\nAssistant:"),
            "max_tokens_to_sample": params.max_tokens,
            "temperature": params.temperature,
            "top_p": params.top_p,
        }),
        PromptShape::TitanText => json!({
            "inputText": format!("{system}\n\nUser: {question}\nBot:"),
            "textGenerationConfig": {
                "maxTokenCount": params.max_tokens,
                "temperature": params.temperature,
                "topP": params.top_p,
            },
        }),
        PromptShape::Generic => json!({
            "prompt": format!("{system}\n\nUser: {question}\nAssistant:"),
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "top_p": params.top_p,
        }),
    }
}
