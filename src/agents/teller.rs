//! # Teller: the consumer loop.
//!
//! ## States
//! ```text
//! Ready ──► WaitingForWork ──(ticket)──► Serving ──┐
//!               ▲   │                               │
//!               │   └──(Closed)──► Closed           │
//!               └───────────────────────────────────┘
//! ```
//!
//! ## Serving a ticket
//! 1. withdraw only: manager gate → hold for `manager_delay` → release
//! 2. safe gate → hold for `safe_delay` → release
//! 3. fire the customer's completion signal
//! 4. record the customer as served; the teller that serves the last one
//!    broadcast-wakes every parked teller
//!
//! ## Rules
//! - `manager` is always acquired before `safe`, and released before `safe` is requested.
//! - The only normal exit is `Dequeue::Closed`, which the queue returns only when the
//!   served counter is complete.
//! - Cancellation drops whatever pass is held; the ticket's completion sender is dropped
//!   with it, so the customer observes `Abandoned` instead of hanging.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    agents::{Agent, AgentId},
    core::{Floor, runner::pause},
    error::AgentError,
    events::{Event, EventKind},
    sync::{Dequeue, Ticket},
};

/// Consumer agent serving tickets from the work queue.
pub struct Teller {
    id: u32,
    floor: Arc<Floor>,
}

impl Teller {
    /// Creates teller `id` working on `floor`.
    pub fn new(id: u32, floor: Arc<Floor>) -> Self {
        Self { id, floor }
    }

    async fn serve(&self, ticket: Ticket, ctx: &CancellationToken) -> Result<(), AgentError> {
        let floor = &*self.floor;
        let Ticket {
            customer,
            transaction,
            done,
        } = ticket;
        let ev = |kind| Event::new(kind).with_teller(self.id).with_customer(customer);

        floor.publish(ev(EventKind::TellerServing).with_transaction(transaction));
        floor.publish(ev(EventKind::TransactionRequested).with_transaction(transaction));

        if transaction.needs_manager() {
            floor.publish(ev(EventKind::ManagerRequested));
            let pass = floor.manager.acquire_or_cancel(ctx).await?;
            floor.publish(ev(EventKind::ManagerEntered));
            pause(floor.config().manager_delay, ctx).await?;
            drop(pass);
            floor.publish(ev(EventKind::ManagerDone));
        }

        floor.publish(ev(EventKind::SafeRequested));
        let pass = floor.safe.acquire_or_cancel(ctx).await?;
        floor.publish(ev(EventKind::SafeEntered));
        pause(floor.config().safe_delay, ctx).await?;
        drop(pass);
        floor.publish(ev(EventKind::SafeDone));

        floor.publish(ev(EventKind::TransactionDone).with_transaction(transaction));
        // `false` means the customer was cancelled; the work still counts.
        let _ = done.fire(self.id);

        floor.served.record(|| floor.queue.wake_all()).await;
        Ok(())
    }
}

#[async_trait]
impl Agent for Teller {
    fn id(&self) -> AgentId {
        AgentId::Teller(self.id)
    }

    async fn run(self, ctx: CancellationToken) -> Result<(), AgentError> {
        let floor = Arc::clone(&self.floor);

        floor.publish(Event::new(EventKind::TellerReady).with_teller(self.id));
        floor.barrier.arrive();

        loop {
            match floor.queue.dequeue_or_cancel(&floor.served, &ctx).await? {
                Dequeue::Ticket(ticket) => self.serve(ticket, &ctx).await?,
                Dequeue::Closed => {
                    floor.publish(Event::new(EventKind::TellerClosing).with_teller(self.id));
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{agents::Transaction, core::Config, events::Bus, sync::completion};

    #[tokio::test]
    async fn test_serves_withdrawal_then_closes() {
        let cfg = Config {
            tellers: 1,
            customers: 1,
            ..Config::default()
        }
        .without_delays();
        let floor = Arc::new(Floor::new(cfg, Bus::new(64)));
        let (done, signal) = completion(7);
        floor
            .queue
            .enqueue(Ticket {
                customer: 7,
                transaction: Transaction::Withdraw,
                done,
            })
            .await;

        let teller = Teller::new(0, Arc::clone(&floor));
        assert_eq!(teller.run(CancellationToken::new()).await, Ok(()));

        assert_eq!(signal.wait().await, Ok(0));
        assert_eq!(floor.served.get().await, 1);
        assert_eq!(floor.manager.peak(), 1);
        assert_eq!(floor.safe.held(), 0);
    }

    #[tokio::test]
    async fn test_deposit_skips_manager() {
        let cfg = Config {
            tellers: 1,
            customers: 1,
            ..Config::default()
        }
        .without_delays();
        let floor = Arc::new(Floor::new(cfg, Bus::new(64)));
        let (done, _signal) = completion(2);
        floor
            .queue
            .enqueue(Ticket {
                customer: 2,
                transaction: Transaction::Deposit,
                done,
            })
            .await;

        Teller::new(1, Arc::clone(&floor))
            .run(CancellationToken::new())
            .await
            .expect("teller closes");
        assert_eq!(floor.manager.peak(), 0);
        assert_eq!(floor.safe.peak(), 1);
    }
}
