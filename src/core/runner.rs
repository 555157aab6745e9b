//! # Run one agent and report how it ended.
//!
//! [`run_agent`] drives a single [`Agent`] with its own child token and publishes
//! `AgentCancelled` when it stops on the cancellation path.
//!
//! ## Event flow
//! ```text
//! Normal exit:
//!   agent.run() → Ok(())  → (the agent already published TellerClosing / CustomerLeaving)
//!
//! Cancellation:
//!   agent.run() → Err(Canceled | Abandoned) → publish AgentCancelled{ agent, reason }
//! ```
//!
//! [`pause`] is the one place simulated work happens: a sampled sleep raced
//! against the agent's token.

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    agents::Agent,
    error::AgentError,
    events::{Bus, Event, EventKind},
    policies::DelayRange,
};

/// Runs `agent` to completion, publishing `AgentCancelled` if it did not finish normally.
pub async fn run_agent<A: Agent>(
    agent: A,
    token: CancellationToken,
    bus: Bus,
) -> Result<(), AgentError> {
    let id = agent.id();
    let res = agent.run(token).await;

    if let Err(e) = &res {
        bus.publish(
            Event::new(EventKind::AgentCancelled)
                .with_agent(id)
                .with_reason(e.as_label()),
        );
    }
    res
}

/// Sleeps for a duration drawn from `range`, unless `token` is cancelled first.
pub async fn pause(range: DelayRange, token: &CancellationToken) -> Result<(), AgentError> {
    let delay = range.sample();
    if delay.is_zero() {
        // Still a scheduling point, so zero-delay runs interleave agents.
        tokio::task::yield_now().await;
        return if token.is_cancelled() {
            Err(AgentError::Canceled)
        } else {
            Ok(())
        };
    }

    let sleep = time::sleep(delay);
    tokio::pin!(sleep);
    select! {
        _ = &mut sleep => Ok(()),
        _ = token.cancelled() => Err(AgentError::Canceled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pause_zero_returns_immediately() {
        let token = CancellationToken::new();
        assert_eq!(pause(DelayRange::ZERO, &token).await, Ok(()));
    }

    #[tokio::test]
    async fn test_pause_aborts_on_cancel() {
        let token = CancellationToken::new();
        let long = DelayRange::fixed(Duration::from_secs(60));

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let res = tokio::time::timeout(Duration::from_secs(2), pause(long, &token))
            .await
            .expect("pause ignored cancellation");
        assert_eq!(res, Err(AgentError::Canceled));
    }
}
