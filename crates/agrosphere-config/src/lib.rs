//! Configuration for the AgroSphere gateway
//!
//! Loaded once at startup from a TOML file and treated as immutable for the
//! lifetime of the process.

#![allow(clippy::must_use_candidate)]

pub mod dispatch;
mod env;
pub mod fallback;
mod loader;
pub mod providers;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use dispatch::*;
pub use fallback::*;
pub use providers::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level gateway configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP listener and health endpoint
    #[serde(default)]
    pub server: ServerConfig,
    /// Per-request dispatch limits
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Upstream inference providers
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Recovery order after a provider failure
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Optional OTLP export
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
