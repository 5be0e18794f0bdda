use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Bounds applied to every provider invocation
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Upper bound for a single provider call (e.g. "4s", "750ms")
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

const fn default_timeout() -> Duration {
    Duration::from_secs(4)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_four_seconds() {
        let config: DispatchConfig = toml::from_str("").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(4));
    }

    #[test]
    fn parses_human_durations() {
        let config: DispatchConfig = toml::from_str("timeout = \"750ms\"").unwrap();
        assert_eq!(config.timeout, Duration::from_millis(750));
    }

    #[test]
    fn rejects_garbage_durations() {
        let err = toml::from_str::<DispatchConfig>("timeout = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("invalid duration"));
    }
}
