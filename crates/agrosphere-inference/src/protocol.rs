//! JSON bodies accepted and returned by the inference endpoints

use agrosphere_core::{CanonicalResult, ConfidenceSource, Origin, ResultStatus, SensorReadings};
use serde::{Deserialize, Serialize};

/// `POST /api/v1/chat` body: free text, sensor readings, or both
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(flatten)]
    pub readings: SensorReadings,
}

/// `POST /api/v1/predict` body: all four readings are required
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub ph: f64,
}

impl From<PredictRequest> for SensorReadings {
    fn from(body: PredictRequest) -> Self {
        Self {
            temperature: Some(body.temperature),
            humidity: Some(body.humidity),
            moisture: Some(body.moisture),
            ph: Some(body.ph),
        }
    }
}

/// Answer text, keyed by the endpoint that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Reply(String),
    Prediction(String),
}

/// Response body for both endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResponse {
    #[serde(flatten)]
    pub answer: Answer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_source: Option<ConfidenceSource>,
    pub status: ResultStatus,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl InferenceResponse {
    /// Body for the chat endpoint, answer under `reply`
    pub fn reply(result: &CanonicalResult) -> Self {
        Self::new(Answer::Reply(result.reply().to_owned()), result)
    }

    /// Body for the predict endpoint, answer under `prediction`
    pub fn prediction(result: &CanonicalResult) -> Self {
        Self::new(Answer::Prediction(result.reply().to_owned()), result)
    }

    fn new(answer: Answer, result: &CanonicalResult) -> Self {
        let confidence = result.confidence();

        Self {
            answer,
            confidence: confidence.map(|c| c.value()),
            confidence_source: confidence.map(|c| c.source()),
            status: result.status(),
            origin: result.origin(),
            model_used: result.model_used().map(str::to_owned),
        }
    }
}
