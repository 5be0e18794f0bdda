//! Inference dispatch for the AgroSphere gateway
//!
//! Wires the classifier and fallback chain to the two upstream provider
//! families (a structured sensor-reading predictor and a conversational
//! language model), normalizes whatever they return into a
//! [`CanonicalResult`](agrosphere_core::CanonicalResult), and exposes the
//! whole thing as axum routes behind the `http` feature.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod dispatcher;
pub mod error;
#[cfg(feature = "http")]
pub mod handler;
pub mod invocation;
pub mod normalize;
pub mod protocol;
pub mod provider;

pub use dispatcher::{Dispatcher, Resolution};
pub use error::ProviderError;
#[cfg(feature = "http")]
pub use handler::inference_router;
pub use invocation::{InvocationOutcome, ProviderInvocation};
pub use provider::{Provider, ProviderSet, RawProviderResult};
