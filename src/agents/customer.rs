//! # Customer: the producer.
//!
//! ## States
//! ```text
//! Arriving ──(barrier open)──► WaitingForDoor ──(door pass)──► Queued
//!     ──(ticket enqueued)──► WaitingForService ──(signal fired)──► Left
//! ```
//!
//! The door pass is held from entering until the completion signal fires, so at
//! most `door_capacity` customers are inside, queued or being served. Dropping the
//! pass is the only release, which makes "exactly once" hold on every path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    agents::{Agent, AgentId, Transaction},
    core::Floor,
    error::AgentError,
    events::{Event, EventKind},
    sync::{CompletionSender, CompletionSignal, Ticket, completion},
};

/// Producer agent: one visit to the bank.
pub struct Customer {
    id: u32,
    transaction: Transaction,
    done: CompletionSender,
    signal: CompletionSignal,
    floor: Arc<Floor>,
}

impl Customer {
    /// Creates customer `id`; its completion signal exists before the agent starts.
    pub fn new(id: u32, transaction: Transaction, floor: Arc<Floor>) -> Self {
        let (done, signal) = completion(id);
        Self {
            id,
            transaction,
            done,
            signal,
            floor,
        }
    }
}

#[async_trait]
impl Agent for Customer {
    fn id(&self) -> AgentId {
        AgentId::Customer(self.id)
    }

    async fn run(self, ctx: CancellationToken) -> Result<(), AgentError> {
        let Customer {
            id,
            transaction,
            done,
            signal,
            floor,
        } = self;
        let ev = |kind| Event::new(kind).with_customer(id);

        floor.publish(ev(EventKind::CustomerArriving).with_transaction(transaction));
        floor.barrier.wait_or_cancel(&ctx).await?;

        let door = floor.door.acquire_or_cancel(&ctx).await?;
        floor.publish(ev(EventKind::CustomerEntered));

        floor.publish(ev(EventKind::CustomerQueued));
        floor
            .queue
            .enqueue(Ticket {
                customer: id,
                transaction,
                done,
            })
            .await;

        let teller = signal.wait_or_cancel(&ctx).await?;
        floor.publish(ev(EventKind::CustomerLeaving).with_teller(teller));
        drop(door);
        Ok(())
    }
}
