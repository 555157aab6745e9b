//! # Journal: in-memory event recorder.
//!
//! Keeps every event it receives, in delivery order. Meant for tests and
//! post-run inspection; the bank drains subscriber queues before `run` returns,
//! so after `run` the journal holds the whole trace.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Recording subscriber.
#[derive(Default)]
pub struct Journal {
    events: Mutex<Vec<Event>>,
}

impl Journal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor returning a shared handle.
    #[must_use]
    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Copy of everything recorded so far.
    pub async fn events(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }

    /// Recorded events of one kind.
    pub async fn of_kind(&self, kind: EventKind) -> Vec<Event> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|ev| ev.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of recorded events of one kind.
    pub async fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|ev| ev.kind == kind)
            .count()
    }
}

#[async_trait]
impl Subscribe for Journal {
    async fn on_event(&self, ev: &Event) {
        self.events.lock().await.push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "journal"
    }

    fn queue_capacity(&self) -> usize {
        1 << 16
    }
}
