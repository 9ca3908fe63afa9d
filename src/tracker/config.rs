use std::time::Duration;

use crate::error::{Result, TrackerError};

/// Configuration for relay status polling.
///
/// Every field has a sensible default: the poll interval falls back to the
/// adapter's own cadence, polling is unbounded until a terminal state, and
/// three consecutive transport failures end in `RelayError`.
///
/// # Examples
///
/// ```rust
/// use gmp_tracker::PollingConfig;
///
/// // Adapter cadence, unbounded
/// let config = PollingConfig::default();
///
/// // Give up after 120 polls, one every 2 seconds
/// let config = PollingConfig::default()
///     .with_max_attempts(120)
///     .with_poll_interval_ms(2_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Overrides the adapter's poll interval.
    pub poll_interval_ms: Option<u64>,
    /// Stop polling after this many polls; the tracker stays pending.
    pub max_attempts: Option<u32>,
    /// Consecutive transport failures that end in `RelayError`.
    pub max_consecutive_failures: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: None,
            max_attempts: None,
            max_consecutive_failures: 3,
        }
    }
}

impl PollingConfig {
    /// One-second polling bounded to ten minutes, for interactive tools.
    pub fn interactive() -> Self {
        Self {
            poll_interval_ms: Some(1_000),
            max_attempts: Some(600),
            ..Self::default()
        }
    }

    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = Some(millis);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = failures;
        self
    }

    /// The interval to sleep between polls given the adapter's default.
    pub fn interval_or(&self, adapter_default: Duration) -> Duration {
        self.poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(adapter_default)
    }

    /// Upper bound on time spent sleeping between polls, if bounded.
    pub fn total_timeout(&self, adapter_default: Duration) -> Option<Duration> {
        self.max_attempts
            .map(|attempts| self.interval_or(adapter_default) * attempts.saturating_sub(1))
    }

    /// Rejects configurations that would spin or never poll.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == Some(0) {
            return Err(TrackerError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(TrackerError::InvalidConfig(
                "max attempts must be greater than zero".to_string(),
            ));
        }
        if self.max_consecutive_failures == 0 {
            return Err(TrackerError::InvalidConfig(
                "max consecutive failures must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = PollingConfig::default();
        assert_eq!(config.poll_interval_ms, None);
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.max_consecutive_failures, 3);
        assert_eq!(config.total_timeout(Duration::from_secs(5)), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interval_falls_back_to_adapter() {
        let adapter_default = Duration::from_secs(5);
        assert_eq!(PollingConfig::default().interval_or(adapter_default), adapter_default);
        assert_eq!(
            PollingConfig::default()
                .with_poll_interval_ms(250)
                .interval_or(adapter_default),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_interactive_preset() {
        let config = PollingConfig::interactive();
        assert_eq!(
            config.total_timeout(Duration::from_secs(5)),
            Some(Duration::from_secs(599))
        );
    }

    #[rstest]
    #[case(PollingConfig::default().with_poll_interval_ms(0))]
    #[case(PollingConfig::default().with_max_attempts(0))]
    #[case(PollingConfig::default().with_max_consecutive_failures(0))]
    fn test_invalid_configs(#[case] config: PollingConfig) {
        assert!(matches!(
            config.validate(),
            Err(TrackerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_is_copy() {
        let config = PollingConfig::interactive();
        let copied = config;
        assert_eq!(config, copied);
    }
}
