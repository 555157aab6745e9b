//! # WorkQueue: FIFO handoff from customers to tellers.
//!
//! A mutex-guarded `VecDeque` plus a [`Notify`] acting as the queue's wait condition.
//!
//! ## Guarded wait
//! ```text
//! dequeue_or_wait():
//!   loop {
//!     register interest in a wake          (Notified::enable)
//!     lock queue → pop_front → unlock      → Some(ticket): return Ticket
//!     lock counter → complete? → unlock    → true: return Closed
//!     await wake (or cancellation)         → loop and re-check
//!   }
//! ```
//! Interest is registered *before* the predicate is checked, so a wake that lands
//! between the check and the await is never lost. A woken teller always re-checks:
//! two tellers may wake for one ticket, only one pops it.
//!
//! ## Wakes
//! - `enqueue` wakes **one** waiter (`notify_one`).
//! - `wake_all` wakes **every** parked waiter (`notify_waiters`), used on termination.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::{
    select,
    sync::{Mutex, Notify},
};
use tokio_util::sync::CancellationToken;

use crate::{agents::Transaction, error::AgentError};

use super::{counter::ServedCounter, signal::CompletionSender};

/// One pending request: who is waiting, what they want, and how to tell them it's done.
#[derive(Debug)]
pub struct Ticket {
    /// Customer identity.
    pub customer: u32,
    /// Requested transaction.
    pub transaction: Transaction,
    /// Firing half of the customer's completion signal.
    pub done: CompletionSender,
}

/// Outcome of [`WorkQueue::dequeue_or_wait`].
#[derive(Debug)]
pub enum Dequeue {
    /// A customer to serve.
    Ticket(Ticket),
    /// Queue is empty and every customer has been served.
    Closed,
}

/// Mutex-guarded FIFO of tickets with a single wait condition.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<Ticket>>,
    ready: Notify,
    enqueued: AtomicU64,
    dequeued: AtomicU64,
}

impl WorkQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a ticket to the tail and wakes one waiting teller.
    pub async fn enqueue(&self, ticket: Ticket) {
        let mut items = self.items.lock().await;
        items.push_back(ticket);
        self.enqueued.fetch_add(1, Ordering::SeqCst);
        self.ready.notify_one();
    }

    /// Pops the head ticket without waiting.
    pub async fn try_dequeue(&self) -> Option<Ticket> {
        let mut items = self.items.lock().await;
        let ticket = items.pop_front()?;
        self.dequeued.fetch_add(1, Ordering::SeqCst);
        Some(ticket)
    }

    /// Returns the next ticket, or [`Dequeue::Closed`] once `served` is complete
    /// and nothing is left to take.
    ///
    /// Parks while the queue is empty and the bank still expects customers.
    pub async fn dequeue_or_wait(&self, served: &ServedCounter) -> Dequeue {
        let never = CancellationToken::new();
        match self.dequeue_or_cancel(served, &never).await {
            Ok(outcome) => outcome,
            // `never` is not cancelled by anyone.
            Err(_) => Dequeue::Closed,
        }
    }

    /// Like [`dequeue_or_wait`](Self::dequeue_or_wait), but gives up when `token` is cancelled.
    pub async fn dequeue_or_cancel(
        &self,
        served: &ServedCounter,
        token: &CancellationToken,
    ) -> Result<Dequeue, AgentError> {
        loop {
            let notified = self.ready.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(ticket) = self.try_dequeue().await {
                return Ok(Dequeue::Ticket(ticket));
            }
            if served.is_complete().await {
                return Ok(Dequeue::Closed);
            }

            select! {
                biased;
                _ = token.cancelled() => return Err(AgentError::Canceled),
                _ = &mut notified => {}
            }
        }
    }

    /// Wakes every parked teller so it re-checks the termination predicate.
    pub fn wake_all(&self) {
        self.ready.notify_waiters();
    }

    /// Tickets currently waiting.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// True when no ticket is waiting.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Tickets ever enqueued.
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::SeqCst)
    }

    /// Tickets ever dequeued.
    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::SeqCst)
    }
}
