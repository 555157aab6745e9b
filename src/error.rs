//! Error types used by the bank runtime and its agents.
//!
//! This module defines three enums:
//!
//! - [`RuntimeError`]: errors raised by the coordinator itself.
//! - [`AgentError`]: why a single teller or customer stopped early.
//! - [`ConfigError`]: a [`Config`](crate::Config) that cannot describe a working bank.
//!
//! All of them provide `as_label` (stable snake_case for logs/metrics) and `as_message`.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the bank runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The configuration was rejected before any agent was spawned.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Shutdown grace period was exceeded; some agents were still parked.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Agents (e.g. `teller-1`, `customer-7`) that had not finished in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bankfloor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidConfig(_) => "runtime_invalid_config",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::InvalidConfig(e) => format!("invalid config: {}", e.as_message()),
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck agents={stuck:?}")
            }
        }
    }
}

/// # Reasons an agent stops before finishing its state machine.
///
/// Neither variant is a bug in the protocol: both only happen on the
/// cancellation path, and in both cases every gate the agent held has
/// already been released by the time the error is returned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The agent's cancellation token fired while it was blocked or working.
    #[error("agent cancelled")]
    Canceled,

    /// The customer's completion signal was dropped without being fired
    /// (its teller was cancelled mid-service).
    #[error("customer {customer} abandoned: teller dropped the completion signal")]
    Abandoned {
        /// Identity of the waiting customer.
        customer: u32,
    },
}

impl AgentError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bankfloor::AgentError;
    ///
    /// assert_eq!(AgentError::Canceled.as_label(), "agent_canceled");
    /// assert_eq!(AgentError::Abandoned { customer: 3 }.as_label(), "agent_abandoned");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AgentError::Canceled => "agent_canceled",
            AgentError::Abandoned { .. } => "agent_abandoned",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            AgentError::Canceled => "cancelled while waiting or working".to_string(),
            AgentError::Abandoned { customer } => {
                format!("customer {customer} was never served")
            }
        }
    }
}

/// # Configuration values that cannot produce a terminating bank.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// At least one teller is required, otherwise queued customers are never served.
    #[error("at least one teller is required")]
    NoTellers,

    /// A gate with zero permits would block every agent that reaches it.
    #[error("gate '{gate}' must have a capacity of at least 1")]
    ZeroCapacity {
        /// Gate name (`door`, `manager` or `safe`).
        gate: &'static str,
    },

    /// A delay range whose lower bound is above its upper bound.
    #[error("delay range '{field}' has min > max")]
    InvertedRange {
        /// Config field holding the range.
        field: &'static str,
    },

    /// More agents than there are `u32` ids.
    #[error("'{field}' does not fit in a u32 agent id")]
    TooManyAgents {
        /// Config field holding the count.
        field: &'static str,
    },

    /// Fixed transactions were supplied but do not cover every customer exactly once.
    #[error("expected {expected} fixed transactions, got {got}")]
    TransactionCount {
        /// Configured customer count.
        expected: usize,
        /// Length of the supplied list.
        got: usize,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NoTellers => "config_no_tellers",
            ConfigError::ZeroCapacity { .. } => "config_zero_capacity",
            ConfigError::InvertedRange { .. } => "config_inverted_range",
            ConfigError::TooManyAgents { .. } => "config_too_many_agents",
            ConfigError::TransactionCount { .. } => "config_transaction_count",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_runtime_error() {
        let err: RuntimeError = ConfigError::ZeroCapacity { gate: "safe" }.into();
        assert_eq!(err.as_label(), "runtime_invalid_config");
        assert!(err.as_message().contains("safe"));
    }

    #[test]
    fn test_abandoned_message_names_customer() {
        let err = AgentError::Abandoned { customer: 42 };
        assert_eq!(err.to_string(), "customer 42 abandoned: teller dropped the completion signal");
        assert_eq!(err.as_message(), "customer 42 was never served");
    }
}
