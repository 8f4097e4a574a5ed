//! Runtime settings
//!
//! Defaults are the reference constants. The command line is the only way to
//! override them; there is no configuration file.

use std::time::Duration;

use crate::services::aggregator::DEFAULT_QUORUM;
use crate::services::fetcher::DEFAULT_TIMEOUT;
use crate::services::history::DEFAULT_CAPACITY;
use crate::services::tracker::DEFAULT_ESCALATE_AFTER;
use crate::types::{PricewatchError, Result};

/// Periodic refresh interval of the dashboard
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// USD amount shown on startup
pub const DEFAULT_AMOUNT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Per-source request deadline
    pub timeout: Duration,
    /// Minimum successful sources for a live round
    pub quorum: usize,
    /// Points kept in the history window
    pub history_capacity: usize,
    pub refresh_interval: Duration,
    /// Synthetic rounds in a row before showing an outage banner (0 disables)
    pub escalate_after: u32,
    pub amount: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            quorum: DEFAULT_QUORUM,
            history_capacity: DEFAULT_CAPACITY,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            escalate_after: DEFAULT_ESCALATE_AFTER,
            amount: DEFAULT_AMOUNT,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(PricewatchError::Config("timeout must be greater than 0".into()));
        }
        if self.quorum == 0 {
            return Err(PricewatchError::Config("quorum must be at least 1".into()));
        }
        if self.history_capacity == 0 {
            return Err(PricewatchError::Config(
                "history capacity must be at least 1".into(),
            ));
        }
        if self.refresh_interval.is_zero() {
            return Err(PricewatchError::Config(
                "refresh interval must be greater than 0".into(),
            ));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(PricewatchError::Config(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let settings = Settings::default();
        assert_eq!(settings.timeout, Duration::from_millis(5000));
        assert_eq!(settings.quorum, 2);
        assert_eq!(settings.history_capacity, 20);
        assert_eq!(settings.refresh_interval, Duration::from_secs(30));
        assert_eq!(settings.escalate_after, 3);
        assert_eq!(settings.amount, 100.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let cases = [
            Settings {
                timeout: Duration::ZERO,
                ..Settings::default()
            },
            Settings {
                quorum: 0,
                ..Settings::default()
            },
            Settings {
                history_capacity: 0,
                ..Settings::default()
            },
            Settings {
                refresh_interval: Duration::ZERO,
                ..Settings::default()
            },
        ];

        for settings in cases {
            assert!(matches!(
                settings.validate(),
                Err(PricewatchError::Config(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let settings = Settings {
            amount: -1.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_amount_allowed() {
        let settings = Settings {
            amount: 0.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
