//! Dispatcher configuration types
//!
//! The handlers themselves take no configuration. What a host can tune is
//! how the dispatcher reports failures back to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the dispatcher does when a callback fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return the error to the caller of `dispatch`
    #[default]
    Propagate,
    /// Log the error and report success, so the host keeps running
    LogAndContinue,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Propagate => write!(f, "propagate"),
            ErrorPolicy::LogAndContinue => write!(f, "log_and_continue"),
        }
    }
}

/// Configuration for the dispatcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// How callback failures are surfaced
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

impl DispatchConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the error policy
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Whether failures should be swallowed after logging
    pub fn continues_on_error(&self) -> bool {
        self.error_policy == ErrorPolicy::LogAndContinue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_config_builder() {
        let config = DispatchConfig::new();
        assert_eq!(config.error_policy, ErrorPolicy::Propagate);
        assert!(!config.continues_on_error());

        let config = config.with_error_policy(ErrorPolicy::LogAndContinue);
        assert!(config.continues_on_error());
    }

    #[test]
    fn test_dispatch_config_deserialization() {
        let config: DispatchConfig =
            serde_json::from_str(r#"{"error_policy":"log_and_continue"}"#).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::LogAndContinue);

        let config: DispatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DispatchConfig::default());
    }
}
