//! # One-shot completion signal between a teller and the customer it serves.
//!
//! [`completion`] creates a linked pair: the [`CompletionSender`] travels with the
//! customer's ticket through the work queue, the [`CompletionSignal`] stays with the
//! customer agent. `fire` consumes the sender, so a signal fires at most once by
//! construction.
//!
//! ```text
//! Customer ── enqueue(Ticket{ done: CompletionSender }) ──► WorkQueue ──► Teller
//!    │                                                                     │
//!    └── CompletionSignal::wait() ◄─────────── done.fire(teller_id) ───────┘
//! ```

use tokio::{select, sync::oneshot};
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

/// Creates a linked sender/receiver pair for `customer`.
pub fn completion(customer: u32) -> (CompletionSender, CompletionSignal) {
    let (tx, rx) = oneshot::channel();
    (
        CompletionSender { tx },
        CompletionSignal { customer, rx },
    )
}

/// Firing half; owned by whichever teller dequeued the ticket.
#[derive(Debug)]
pub struct CompletionSender {
    tx: oneshot::Sender<u32>,
}

impl CompletionSender {
    /// Fires the signal on behalf of `teller`.
    ///
    /// Returns `false` if the customer is no longer waiting (it was cancelled).
    pub fn fire(self, teller: u32) -> bool {
        self.tx.send(teller).is_ok()
    }
}

/// Waiting half; owned by the customer.
#[derive(Debug)]
pub struct CompletionSignal {
    customer: u32,
    rx: oneshot::Receiver<u32>,
}

impl CompletionSignal {
    /// Customer this signal belongs to.
    pub fn customer(&self) -> u32 {
        self.customer
    }

    /// Waits until served and returns the serving teller's id.
    pub async fn wait(self) -> Result<u32, AgentError> {
        let customer = self.customer;
        self.rx
            .await
            .map_err(|_dropped| AgentError::Abandoned { customer })
    }

    /// Like [`wait`](Self::wait), but gives up when `token` is cancelled.
    pub async fn wait_or_cancel(self, token: &CancellationToken) -> Result<u32, AgentError> {
        select! {
            biased;
            _ = token.cancelled() => Err(AgentError::Canceled),
            res = self.wait() => res,
        }
    }
}
