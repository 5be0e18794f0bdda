use std::time::Duration;

use agrosphere_core::ProviderFamily;
use agrosphere_routing::AttemptKind;
use jiff::Timestamp;

use crate::error::ProviderError;
use crate::provider::RawProviderResult;

/// How one provider attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success(RawProviderResult),
    Failure(ProviderError),
}

impl InvocationOutcome {
    /// Short outcome label for logs and metrics
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure(error) => error.kind(),
        }
    }
}

/// Record of a single provider attempt
///
/// Created once per attempt and kept only while the request resolves.
#[derive(Debug, Clone)]
pub struct ProviderInvocation {
    provider: String,
    family: ProviderFamily,
    attempt: AttemptKind,
    started_at: Timestamp,
    elapsed: Duration,
    outcome: InvocationOutcome,
}

impl ProviderInvocation {
    pub(crate) const fn new(
        provider: String,
        family: ProviderFamily,
        attempt: AttemptKind,
        started_at: Timestamp,
        elapsed: Duration,
        outcome: InvocationOutcome,
    ) -> Self {
        Self {
            provider,
            family,
            attempt,
            started_at,
            elapsed,
            outcome,
        }
    }

    /// Endpoint or model identity; the family name for a disabled provider
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub const fn family(&self) -> ProviderFamily {
        self.family
    }

    pub const fn attempt(&self) -> AttemptKind {
        self.attempt
    }

    pub const fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub const fn outcome(&self) -> &InvocationOutcome {
        &self.outcome
    }

    pub const fn succeeded(&self) -> bool {
        matches!(self.outcome, InvocationOutcome::Success(_))
    }
}
