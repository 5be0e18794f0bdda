//! Fallback chain
//!
//! Built once from configuration and read-only afterwards. The chain is
//! depth-1: after the primary fails there is at most one alternate
//! attempt, and after that the static offline reply.

use agrosphere_config::{FallbackConfig, ProvidersConfig};
use agrosphere_core::{CanonicalResult, ProviderFamily};

use crate::RoutingDecision;

/// Which attempt for a request just failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    Primary,
    Alternate,
}

impl AttemptKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Alternate => "alternate",
        }
    }
}

/// What the dispatcher should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAction {
    /// Call the provider of this family once
    TryAlternate(ProviderFamily),
    /// Resolve with the static offline reply
    EmitOffline,
}

/// Ordered recovery actions after a provider failure
#[derive(Debug, Clone)]
pub struct FallbackChain {
    structured_alternate: Option<ProviderFamily>,
    conversational_alternate: Option<ProviderFamily>,
    offline_reply: String,
}

impl FallbackChain {
    /// A chain with no alternates
    pub fn offline_only(offline_reply: impl Into<String>) -> Self {
        Self {
            structured_alternate: None,
            conversational_alternate: None,
            offline_reply: offline_reply.into(),
        }
    }

    /// Add an alternate for a primary family
    ///
    /// An alternate naming the primary itself is ignored.
    #[must_use]
    pub fn with_alternate(mut self, primary: ProviderFamily, alternate: ProviderFamily) -> Self {
        if primary == alternate {
            return self;
        }

        match primary {
            ProviderFamily::StructuredPrediction => self.structured_alternate = Some(alternate),
            ProviderFamily::Conversational => self.conversational_alternate = Some(alternate),
        }
        self
    }

    /// Build the chain from configuration
    ///
    /// Alternates that point at a disabled provider are dropped.
    pub fn from_config(fallback: &FallbackConfig, providers: &ProvidersConfig) -> Self {
        let mut chain = Self::offline_only(fallback.offline_reply.clone());

        for primary in [ProviderFamily::StructuredPrediction, ProviderFamily::Conversational] {
            let Some(alternate) = fallback.alternate_for(primary) else {
                continue;
            };

            if !is_enabled(providers, alternate) {
                tracing::warn!(
                    primary = %primary,
                    alternate = %alternate,
                    "fallback alternate is disabled, dropping it from the chain"
                );
                continue;
            }

            chain = chain.with_alternate(primary, alternate);
        }

        chain
    }

    /// Alternate configured for a primary family
    pub const fn alternate_for(&self, primary: ProviderFamily) -> Option<ProviderFamily> {
        match primary {
            ProviderFamily::StructuredPrediction => self.structured_alternate,
            ProviderFamily::Conversational => self.conversational_alternate,
        }
    }

    /// Next action after `failed` did not produce a result
    pub const fn next(&self, decision: &RoutingDecision, failed: AttemptKind) -> FallbackAction {
        match failed {
            AttemptKind::Alternate => FallbackAction::EmitOffline,
            AttemptKind::Primary => match self.alternate_for(decision.family()) {
                Some(alternate) => FallbackAction::TryAlternate(alternate),
                None => FallbackAction::EmitOffline,
            },
        }
    }

    /// The static offline answer
    pub fn offline_result(&self) -> CanonicalResult {
        CanonicalResult::offline(self.offline_reply.as_str())
    }
}

const fn is_enabled(providers: &ProvidersConfig, family: ProviderFamily) -> bool {
    match family {
        ProviderFamily::StructuredPrediction => providers.structured.enabled,
        ProviderFamily::Conversational => providers.conversational.enabled,
    }
}

#[cfg(test)]
mod tests {
    use agrosphere_core::{Origin, ResultStatus, SensorField};

    use super::*;
    use crate::StructuredEvidence;

    const STRUCTURED: RoutingDecision = RoutingDecision::StructuredPrediction {
        evidence: StructuredEvidence::SensorField(SensorField::Moisture),
    };

    #[test]
    fn without_alternates_primary_failure_goes_offline() {
        let chain = FallbackChain::offline_only("Water in the early morning.");

        assert_eq!(chain.next(&STRUCTURED, AttemptKind::Primary), FallbackAction::EmitOffline);
        assert_eq!(
            chain.next(&RoutingDecision::Conversational, AttemptKind::Primary),
            FallbackAction::EmitOffline
        );
    }

    #[test]
    fn alternate_is_tried_once() {
        let chain = FallbackChain::offline_only("tip")
            .with_alternate(ProviderFamily::StructuredPrediction, ProviderFamily::Conversational);

        assert_eq!(
            chain.next(&STRUCTURED, AttemptKind::Primary),
            FallbackAction::TryAlternate(ProviderFamily::Conversational)
        );
        assert_eq!(chain.next(&STRUCTURED, AttemptKind::Alternate), FallbackAction::EmitOffline);
        // only the structured family has an alternate
        assert_eq!(
            chain.next(&RoutingDecision::Conversational, AttemptKind::Primary),
            FallbackAction::EmitOffline
        );
    }

    #[test]
    fn self_alternate_is_ignored() {
        let chain = FallbackChain::offline_only("tip")
            .with_alternate(ProviderFamily::Conversational, ProviderFamily::Conversational);
        assert!(chain.alternate_for(ProviderFamily::Conversational).is_none());
    }

    #[test]
    fn offline_result_carries_configured_reply() {
        let chain = FallbackChain::offline_only("Mulch your beds.");
        let result = chain.offline_result();

        assert_eq!(result.reply(), "Mulch your beds.");
        assert_eq!(result.status(), ResultStatus::Offline);
        assert_eq!(result.origin(), Origin::Offline);
        assert!(result.confidence().is_none());
    }

    #[test]
    fn from_config_keeps_enabled_alternates() {
        let fallback = FallbackConfig {
            structured_alternate: Some(ProviderFamily::Conversational),
            conversational_alternate: Some(ProviderFamily::StructuredPrediction),
            offline_reply: "tip".to_owned(),
        };

        let chain = FallbackChain::from_config(&fallback, &ProvidersConfig::default());
        assert_eq!(
            chain.alternate_for(ProviderFamily::StructuredPrediction),
            Some(ProviderFamily::Conversational)
        );
        assert_eq!(
            chain.alternate_for(ProviderFamily::Conversational),
            Some(ProviderFamily::StructuredPrediction)
        );
    }

    #[test]
    fn from_config_drops_disabled_alternates() {
        let fallback = FallbackConfig {
            structured_alternate: Some(ProviderFamily::Conversational),
            conversational_alternate: None,
            offline_reply: "tip".to_owned(),
        };
        let mut providers = ProvidersConfig::default();
        providers.conversational.enabled = false;

        let chain = FallbackChain::from_config(&fallback, &providers);
        assert!(chain.alternate_for(ProviderFamily::StructuredPrediction).is_none());
        assert_eq!(chain.next(&STRUCTURED, AttemptKind::Primary), FallbackAction::EmitOffline);
    }
}
