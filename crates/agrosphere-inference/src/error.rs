use std::time::Duration;

use thiserror::Error;

/// Why a single provider attempt produced no result
///
/// Never shown to the caller; the dispatcher turns every variant into a
/// fallback step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// No answer within the per-invocation budget
    #[error("provider did not answer within {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// Connection, DNS, TLS or SDK-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The provider is switched off in configuration
    #[error("provider is disabled")]
    Disabled,

    /// The request lacks the input this provider needs
    #[error("request carries no {0}")]
    MissingInput(&'static str),
}

impl ProviderError {
    /// Short outcome label for logs and metrics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Transport(_) => "transport_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Disabled => "disabled",
            Self::MissingInput(_) => "missing_input",
        }
    }
}
