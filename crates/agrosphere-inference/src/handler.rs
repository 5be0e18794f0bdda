//! Axum route handlers for the chat and predict endpoints

use agrosphere_core::{HttpError, InferenceRequest, REQUEST_ID_HEADER, SensorReadings};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};

use crate::dispatcher::Dispatcher;
use crate::protocol::{ChatRequest, InferenceResponse, PredictRequest};

/// Build the router for the inference endpoints
pub fn inference_router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/api/v1/chat", routing::post(chat))
        .route("/api/v1/predict", routing::post(predict))
        .with_state(dispatcher)
}

/// Handle `POST /api/v1/chat`
async fn chat(State(dispatcher): State<Dispatcher>, headers: HeaderMap, Json(body): Json<ChatRequest>) -> Response {
    let request = match InferenceRequest::new(body.query, body.readings) {
        Ok(request) => with_edge_id(request, &headers),
        Err(rejection) => return error_response(&rejection),
    };

    let result = dispatcher.handle(request).await;
    Json(InferenceResponse::reply(&result)).into_response()
}

/// Handle `POST /api/v1/predict`
async fn predict(
    State(dispatcher): State<Dispatcher>,
    headers: HeaderMap,
    Json(body): Json<PredictRequest>,
) -> Response {
    let request = match InferenceRequest::new(None, SensorReadings::from(body)) {
        Ok(request) => with_edge_id(request, &headers),
        Err(rejection) => return error_response(&rejection),
    };

    let result = dispatcher.handle(request).await;
    Json(InferenceResponse::prediction(&result)).into_response()
}

/// Reuse the request id assigned at the HTTP edge when it is a UUID
fn with_edge_id(request: InferenceRequest, headers: &HeaderMap) -> InferenceRequest {
    let edge_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());

    match edge_id {
        Some(id) => request.with_id(id),
        None => request,
    }
}

/// Render a client error as `{"error": {"type", "message"}}`
fn error_response(error: &impl HttpError) -> Response {
    tracing::debug!(error_type = error.error_type(), "request rejected");

    let body = serde_json::json!({
        "error": {
            "type": error.error_type(),
            "message": error.client_message(),
        }
    });

    (error.status_code(), Json(body)).into_response()
}
