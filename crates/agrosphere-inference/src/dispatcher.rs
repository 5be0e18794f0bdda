//! Request dispatch
//!
//! One straight pass per request: classify, call the primary provider,
//! and on failure follow the fallback chain. There is at most one primary
//! and one alternate call, and every path ends in a [`CanonicalResult`].

use std::sync::Arc;
use std::time::Duration;

use agrosphere_config::Config;
use agrosphere_core::{CanonicalResult, InferenceRequest, ProviderFamily};
use agrosphere_routing::{AttemptKind, FallbackAction, FallbackChain, RoutingDecision, classify};
use agrosphere_telemetry::metrics::{self, INFERENCE_OFFLINE_COUNT, INFERENCE_PROVIDER_DURATION, INFERENCE_REQUEST_COUNT};
use agrosphere_telemetry::{Counter, Histogram, KeyValue};
use jiff::Timestamp;
use tokio::time::Instant;

use crate::error::ProviderError;
use crate::invocation::{InvocationOutcome, ProviderInvocation};
use crate::normalize::Normalizer;
use crate::provider::ProviderSet;

/// Outcome of dispatching one request, with the steps that led to it
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: CanonicalResult,
    pub decision: RoutingDecision,
    pub invocations: Vec<ProviderInvocation>,
}

/// Routes requests to providers and resolves every one of them
///
/// Cheap to clone; all clones share the same provider handles.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    providers: ProviderSet,
    chain: FallbackChain,
    normalizer: Normalizer,
    timeout: Duration,
    instruments: Instruments,
}

struct Instruments {
    requests: Counter<u64>,
    offline: Counter<u64>,
    provider_duration: Histogram<f64>,
}

impl Instruments {
    fn new() -> Self {
        let meter = metrics::meter();

        Self {
            requests: meter
                .u64_counter(INFERENCE_REQUEST_COUNT)
                .with_description("Resolved inference requests")
                .build(),
            offline: meter
                .u64_counter(INFERENCE_OFFLINE_COUNT)
                .with_description("Requests answered with the offline reply")
                .build(),
            provider_duration: meter
                .f64_histogram(INFERENCE_PROVIDER_DURATION)
                .with_description("Upstream provider call latency")
                .with_unit("s")
                .build(),
        }
    }
}

impl Dispatcher {
    pub fn new(providers: ProviderSet, chain: FallbackChain, normalizer: Normalizer, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                providers,
                chain,
                normalizer,
                timeout,
                instruments: Instruments::new(),
            }),
        }
    }

    /// Build providers, fallback chain and normalizer from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider client cannot be constructed
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let providers = ProviderSet::from_config(&config.providers).await?;
        let chain = FallbackChain::from_config(&config.fallback, &config.providers);
        let normalizer = Normalizer::new(config.providers.structured.default_confidence);

        Ok(Self::new(providers, chain, normalizer, config.dispatch.timeout))
    }

    /// Resolve a request to its canonical result
    ///
    /// Never fails: provider errors are absorbed by the fallback chain.
    pub async fn handle(&self, request: InferenceRequest) -> CanonicalResult {
        self.resolve(request).await.result
    }

    /// Resolve a request, keeping the routing decision and attempt records
    pub async fn resolve(&self, request: InferenceRequest) -> Resolution {
        let decision = classify(&request);
        let primary = decision.family();

        tracing::debug!(
            request_id = %request.id(),
            decision = %decision,
            "request classified"
        );

        let mut invocations = Vec::with_capacity(2);

        let result = match self.attempt(&request, primary, AttemptKind::Primary, &mut invocations).await {
            Some(result) => result,
            None => match self.inner.chain.next(&decision, AttemptKind::Primary) {
                FallbackAction::TryAlternate(alternate) => {
                    tracing::warn!(
                        request_id = %request.id(),
                        from = %primary,
                        to = %alternate,
                        "primary provider failed, trying alternate"
                    );

                    match self.attempt(&request, alternate, AttemptKind::Alternate, &mut invocations).await {
                        Some(result) => result.into_degraded(),
                        None => self.offline(&request, primary),
                    }
                }
                FallbackAction::EmitOffline => self.offline(&request, primary),
            },
        };

        self.inner.instruments.requests.add(
            1,
            &[
                KeyValue::new("status", result.status().as_str()),
                KeyValue::new("origin", result.origin().as_str()),
            ],
        );

        tracing::info!(
            request_id = %request.id(),
            status = result.status().as_str(),
            origin = result.origin().as_str(),
            attempts = invocations.len(),
            "request resolved"
        );

        Resolution {
            result,
            decision,
            invocations,
        }
    }

    async fn attempt(
        &self,
        request: &InferenceRequest,
        family: ProviderFamily,
        kind: AttemptKind,
        invocations: &mut Vec<ProviderInvocation>,
    ) -> Option<CanonicalResult> {
        let started_at = Timestamp::now();

        let Some(provider) = self.inner.providers.get(family) else {
            tracing::info!(
                request_id = %request.id(),
                family = %family,
                attempt = kind.as_str(),
                "provider disabled, skipping"
            );
            invocations.push(ProviderInvocation::new(
                family.as_str().to_owned(),
                family,
                kind,
                started_at,
                Duration::ZERO,
                InvocationOutcome::Failure(ProviderError::Disabled),
            ));
            return None;
        };

        let timeout = self.inner.timeout;
        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, provider.invoke(request, timeout))
            .await
            .unwrap_or(Err(ProviderError::Timeout { after: timeout }));
        let elapsed = start.elapsed();

        let outcome = match outcome {
            Ok(raw) => InvocationOutcome::Success(raw),
            Err(error) => InvocationOutcome::Failure(error),
        };

        metrics::record_duration(
            &self.inner.instruments.provider_duration,
            elapsed,
            &[
                KeyValue::new("provider", provider.name().to_owned()),
                KeyValue::new("outcome", outcome.label()),
            ],
        );

        let result = match &outcome {
            InvocationOutcome::Success(raw) => {
                tracing::debug!(
                    request_id = %request.id(),
                    provider = provider.name(),
                    attempt = kind.as_str(),
                    elapsed = ?elapsed,
                    "provider answered"
                );
                Some(self.inner.normalizer.normalize(family, provider.name(), raw))
            }
            InvocationOutcome::Failure(error) => {
                tracing::warn!(
                    request_id = %request.id(),
                    provider = provider.name(),
                    attempt = kind.as_str(),
                    elapsed = ?elapsed,
                    error = %error,
                    "provider invocation failed"
                );
                None
            }
        };

        invocations.push(ProviderInvocation::new(
            provider.name().to_owned(),
            family,
            kind,
            started_at,
            elapsed,
            outcome,
        ));

        result
    }

    fn offline(&self, request: &InferenceRequest, routed_to: ProviderFamily) -> CanonicalResult {
        tracing::warn!(
            request_id = %request.id(),
            family = %routed_to,
            "no provider answered, using offline reply"
        );
        self.inner
            .instruments
            .offline
            .add(1, &[KeyValue::new("family", routed_to.as_str())]);

        self.inner.chain.offline_result()
    }
}
