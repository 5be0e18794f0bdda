//! Mock upstream model endpoints for integration tests
//!
//! One instance stands in for one provider. Structured mocks answer like a
//! hosted predictor, conversational mocks like an Anthropic or Titan text
//! model.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Model identifier given to conversational mocks
pub const MOCK_CHAT_MODEL: &str = "anthropic.claude-instant-v1";

/// Model identifier given to Titan-style mocks
pub const MOCK_TITAN_MODEL: &str = "amazon.titan-text-express-v1";

/// Mock provider that returns predictable responses
pub struct MockProvider {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

#[derive(Clone, Copy)]
enum Flavor {
    Structured,
    Conversational,
    Titan,
}

#[derive(Clone, Copy)]
enum Behavior {
    Answer,
    /// Reply 500 to every request
    Fail,
    /// Hold every request open for the given time before answering
    Stall(Duration),
}

struct MockState {
    flavor: Flavor,
    behavior: Behavior,
    answer: String,
    request_count: AtomicU32,
    bodies: Mutex<Vec<Value>>,
}

impl MockProvider {
    /// Structured predictor that answers `prediction` with confidence 0.87
    pub async fn structured(prediction: &str) -> anyhow::Result<Self> {
        Self::start(Flavor::Structured, Behavior::Answer, prediction).await
    }

    /// Conversational model that answers `completion`
    pub async fn conversational(completion: &str) -> anyhow::Result<Self> {
        Self::start(Flavor::Conversational, Behavior::Answer, completion).await
    }

    /// Titan-style text model that answers with a top-level `outputText`
    pub async fn titan(output: &str) -> anyhow::Result<Self> {
        Self::start(Flavor::Titan, Behavior::Answer, output).await
    }

    /// Structured predictor that fails every request with 500
    pub async fn failing_structured() -> anyhow::Result<Self> {
        Self::start(Flavor::Structured, Behavior::Fail, "").await
    }

    /// Conversational model that fails every request with 500
    pub async fn failing_conversational() -> anyhow::Result<Self> {
        Self::start(Flavor::Conversational, Behavior::Fail, "").await
    }

    /// Structured predictor that answers only after `delay`
    pub async fn stalled_structured(delay: Duration) -> anyhow::Result<Self> {
        Self::start(Flavor::Structured, Behavior::Stall(delay), "too late").await
    }

    async fn start(flavor: Flavor, behavior: Behavior, answer: &str) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            flavor,
            behavior,
            answer: answer.to_owned(),
            request_count: AtomicU32::new(0),
            bodies: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/invocations", routing::post(handle_invocation))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// URL to configure as the provider endpoint
    pub fn url(&self) -> String {
        format!("http://{}/invocations", self.addr)
    }

    /// Number of requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Most recent request body
    pub fn last_body(&self) -> Option<Value> {
        self.state.bodies.lock().unwrap().last().cloned()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_invocation(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    state.bodies.lock().unwrap().push(body);

    match state.behavior {
        Behavior::Fail => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "model container crashed").into_response();
        }
        Behavior::Stall(delay) => tokio::time::sleep(delay).await,
        Behavior::Answer => {}
    }

    let body = match state.flavor {
        Flavor::Structured => json!({ "prediction": state.answer, "confidence": 0.87 }),
        Flavor::Conversational => json!({ "completion": format!(" {}", state.answer), "stop_reason": "stop_sequence" }),
        Flavor::Titan => json!({ "outputText": state.answer }),
    };

    Json(body).into_response()
}
