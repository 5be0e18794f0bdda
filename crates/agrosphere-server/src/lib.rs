//! HTTP server for the AgroSphere gateway
//!
//! Assembles the inference routes with the health and root endpoints and
//! the shared middleware stack.

mod health;

use std::net::SocketAddr;

use agrosphere_config::Config;
use agrosphere_core::REQUEST_ID_HEADER;
use agrosphere_inference::Dispatcher;
use axum::body::Body;
use axum::{Json, Router};
use http::{HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use health::SERVICE_NAME;

/// Port used when the configuration names no listen address
const DEFAULT_PORT: u16 = 8000;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider client cannot be constructed
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let dispatcher = Dispatcher::from_config(&config).await?;
        Ok(Self::with_dispatcher(&config, dispatcher))
    }

    /// Build the server around an existing dispatcher
    pub fn with_dispatcher(config: &Config, dispatcher: Dispatcher) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        let mut app = Router::new();

        // Health check and welcome document
        let health_path = config.server.health.enabled.then(|| config.server.health.path.clone());
        if let Some(path) = &health_path {
            app = app.route(path, axum::routing::get(health::health_handler));
        }
        let root = health::root_document(health_path.as_deref());
        app = app.route(
            "/",
            axum::routing::get(move || {
                let root = root.clone();
                async move { Json(root) }
            }),
        );

        // Inference routes
        app = app.merge(agrosphere_inference::inference_router(dispatcher));

        // Apply middleware layers (innermost first)
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        app = app.layer(PropagateRequestIdLayer::new(request_id.clone()));

        app = app.layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        }));

        // Outermost: the id exists before tracing and propagation run
        app = app.layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
