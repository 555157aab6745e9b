//! # Agent liveness tracker with sequence-based ordering.
//!
//! Keeps track of which tellers and customers are still running, fed from the event
//! stream by the bank's listener. Used to name the stuck agents when a shutdown
//! overruns its grace period.
//!
//! ## Architecture
//! ```text
//! Agents ──► Bus ──► bank listener ──► AliveTracker::update()
//!                                             │
//!                                             ▼
//!                                 HashMap<AgentId, AgentState>
//!                                     (id → {last_seq, alive})
//! ```
//!
//! ## Rules
//! - `TellerReady` / `CustomerArriving` mark the subject alive
//! - `TellerClosing` / `CustomerLeaving` / `AgentCancelled` mark it gone
//! - Other events about the subject only advance its `last_seq`
//! - Events with `seq <= last_seq` are **rejected** (stale)

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::agents::AgentId;
use crate::events::{Event, EventKind};

#[derive(Debug, Clone)]
struct AgentState {
    last_seq: Option<u64>,
    alive: bool,
}

/// Thread-safe tracker of running agents.
#[derive(Debug, Default)]
pub struct AliveTracker {
    state: RwLock<HashMap<AgentId, AgentState>>,
}

impl AliveTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `ev` if it is newer than the last event seen for its subject.
    ///
    /// Returns `true` when the subject's alive flag was set by this event.
    pub async fn update(&self, ev: &Event) -> bool {
        let Some(agent) = ev.subject() else {
            return false;
        };

        let mut state = self.state.write().await;
        let entry = state.entry(agent).or_insert(AgentState {
            last_seq: None,
            alive: false,
        });

        if entry.last_seq.is_some_and(|last| ev.seq <= last) {
            return false;
        }
        entry.last_seq = Some(ev.seq);

        match ev.kind {
            EventKind::TellerReady | EventKind::CustomerArriving => {
                entry.alive = true;
                true
            }
            EventKind::TellerClosing | EventKind::CustomerLeaving | EventKind::AgentCancelled => {
                entry.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Sorted names of agents that started and have not finished.
    pub async fn snapshot(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut alive: Vec<AgentId> = state
            .iter()
            .filter(|(_, st)| st.alive)
            .map(|(id, _)| *id)
            .collect();
        alive.sort_unstable();
        alive.into_iter().map(|id| id.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lifecycle_marks_alive_then_gone() {
        let tracker = AliveTracker::new();
        let started = Event::new(EventKind::TellerReady).with_teller(1);
        let closed = Event::new(EventKind::TellerClosing).with_teller(1);

        assert!(tracker.update(&started).await);
        assert_eq!(tracker.snapshot().await, vec!["teller-1".to_string()]);

        assert!(tracker.update(&closed).await);
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_event_is_rejected() {
        let tracker = AliveTracker::new();
        let arriving = Event::new(EventKind::CustomerArriving).with_customer(3);
        let leaving = Event::new(EventKind::CustomerLeaving).with_customer(3);

        tracker.update(&leaving).await;
        assert!(!tracker.update(&arriving).await);
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_agent_is_gone() {
        let tracker = AliveTracker::new();
        tracker
            .update(&Event::new(EventKind::CustomerArriving).with_customer(0))
            .await;
        tracker
            .update(&Event::new(EventKind::TellerReady).with_teller(0))
            .await;
        tracker
            .update(&Event::new(EventKind::AgentCancelled).with_agent(AgentId::Customer(0)))
            .await;

        assert_eq!(tracker.snapshot().await, vec!["teller-0".to_string()]);
    }
}
