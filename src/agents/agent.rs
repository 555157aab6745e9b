//! # Agent abstraction.
//!
//! Tellers and customers both implement [`Agent`]: a named, one-shot async state
//! machine that receives a [`CancellationToken`] and must honor it at every
//! suspension point.

use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

/// Identity of an agent, rendered as `teller-N` / `customer-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentId {
    /// Consumer side.
    Teller(u32),
    /// Producer side.
    Customer(u32),
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Teller(id) => write!(f, "teller-{id}"),
            AgentId::Customer(id) => write!(f, "customer-{id}"),
        }
    }
}

/// # One teller or customer.
///
/// `run` consumes the agent: it runs its state machine exactly once.
///
/// # Cancellation contract
/// When `ctx` is cancelled the agent must return `Err(AgentError::Canceled)`
/// promptly, holding no gate pass, and must not resume the wait it was blocked in.
#[async_trait]
pub trait Agent: Send + 'static {
    /// Stable identity used in events and shutdown reports.
    fn id(&self) -> AgentId;

    /// Runs the agent's state machine to completion or cancellation.
    async fn run(self, ctx: CancellationToken) -> Result<(), AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(AgentId::Teller(0).to_string(), "teller-0");
        assert_eq!(AgentId::Customer(12).to_string(), "customer-12");
    }
}
