// src/session/config.rs

use core::time::Duration;

use crate::common::timing;

/// How the session treats the response to a write-register command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AckPolicy {
    /// Require the sensor's echo of the request. State changes only on a confirmed echo.
    #[default]
    Verified,
    /// Drain and discard the response. State changes as soon as the frame is sent.
    Optimistic,
}

/// Session behaviour knobs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Wait between sending a request and draining its response.
    pub settle_delay: Duration,
    pub ack_policy: AckPolicy,
    /// Validate address, function code, byte count and CRC of read responses.
    pub check_response_crc: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            settle_delay: timing::SETTLE_DELAY,
            ack_policy: AckPolicy::Verified,
            check_response_crc: true,
        }
    }
}

impl SessionConfig {
    /// Fire-and-forget writes and unchecked responses.
    pub const fn legacy() -> Self {
        SessionConfig {
            settle_delay: timing::SETTLE_DELAY,
            ack_policy: AckPolicy::Optimistic,
            check_response_crc: false,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_ack_policy(mut self, ack_policy: AckPolicy) -> Self {
        self.ack_policy = ack_policy;
        self
    }

    pub fn with_response_crc_check(mut self, enabled: bool) -> Self {
        self.check_response_crc = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_verified_with_crc() {
        let config = SessionConfig::default();
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert_eq!(config.ack_policy, AckPolicy::Verified);
        assert!(config.check_response_crc);
    }

    #[test]
    fn test_legacy_matches_fire_and_forget() {
        let config = SessionConfig::legacy();
        assert_eq!(config.ack_policy, AckPolicy::Optimistic);
        assert!(!config.check_response_crc);
        assert_eq!(config.settle_delay, timing::SETTLE_DELAY);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_settle_delay(Duration::from_millis(250))
            .with_ack_policy(AckPolicy::Optimistic)
            .with_response_crc_check(false);
        assert_eq!(config.settle_delay, Duration::from_millis(250));
        assert_eq!(config, SessionConfig::legacy().with_settle_delay(Duration::from_millis(250)));
    }
}
