//! # Events emitted by the coordinator, tellers and customers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Customer lifecycle**: arriving, entering, queuing, leaving
//! - **Teller lifecycle**: ready, serving, visiting the manager and the safe, closing
//! - **Bank lifecycle**: open, closed, shutdown and grace outcome
//! - **Subscriber health**: overflow and panic reports
//!
//! The [`Event`] struct carries the metadata: timestamps, teller/customer ids,
//! the transaction kind and a free-form reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events published by one agent are causally ordered by `seq`; when a step of one
//! agent happens-before a step of another (e.g. `TransactionDone` before the customer
//! wakes), their `seq` values respect that order too.
//!
//! ## Example
//! ```rust
//! use bankfloor::{Event, EventKind, Transaction};
//!
//! let ev = Event::new(EventKind::TellerServing)
//!     .with_teller(1)
//!     .with_customer(7)
//!     .with_transaction(Transaction::Withdraw);
//!
//! assert_eq!(ev.kind, EventKind::TellerServing);
//! assert_eq!(ev.teller, Some(1));
//! assert_eq!(ev.customer, Some(7));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::agents::{AgentId, Transaction};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Teller lifecycle ===
    /// Teller initialized and arrived at the startup barrier.
    ///
    /// Sets: `teller`
    TellerReady,

    /// Teller dequeued a customer and starts serving it.
    ///
    /// Sets: `teller`, `customer`, `transaction`
    TellerServing,

    /// Customer told the teller which transaction it wants.
    ///
    /// Sets: `teller`, `customer`, `transaction`
    TransactionRequested,

    /// Teller is walking to the manager (withdrawals only).
    ///
    /// Sets: `teller`, `customer`
    ManagerRequested,

    /// Teller holds the manager gate.
    ///
    /// Sets: `teller`, `customer`
    ManagerEntered,

    /// Teller got the manager's permission and released the manager gate.
    ///
    /// Sets: `teller`, `customer`
    ManagerDone,

    /// Teller is walking to the safe.
    ///
    /// Sets: `teller`, `customer`
    SafeRequested,

    /// Teller holds a safe gate permit.
    ///
    /// Sets: `teller`, `customer`
    SafeEntered,

    /// Teller finished in the safe and released the safe gate.
    ///
    /// Sets: `teller`, `customer`
    SafeDone,

    /// Teller is about to fire the customer's completion signal.
    ///
    /// Sets: `teller`, `customer`, `transaction`
    TransactionDone,

    /// Teller observed the termination predicate with an empty queue and exits.
    ///
    /// Sets: `teller`
    TellerClosing,

    // === Customer lifecycle ===
    /// Customer agent started and is heading to the bank.
    ///
    /// Sets: `customer`, `transaction`
    CustomerArriving,

    /// Customer holds a door permit.
    ///
    /// Sets: `customer`
    CustomerEntered,

    /// Customer is getting in line (published just before the enqueue).
    ///
    /// Sets: `customer`
    CustomerQueued,

    /// Customer observed its completion signal and is releasing the door.
    ///
    /// Sets: `customer`, `teller` (the one that served it)
    CustomerLeaving,

    // === Bank lifecycle ===
    /// Every teller passed the startup barrier.
    BankOpen,

    /// Every agent finished; no more events follow.
    ///
    /// Sets: `reason` (summary)
    BankClosed,

    /// An agent stopped on the cancellation path.
    ///
    /// Sets: `teller` **or** `customer`, `reason` (error label)
    AgentCancelled,

    /// Shutdown requested (OS signal or shutdown token).
    ShutdownRequested,

    /// All agents stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some agents did not stop in time. No more events follow.
    ///
    /// Sets: `reason` (stuck agents)
    GraceExceeded,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed), or the bank's
    /// listener fell behind the bus and skipped events.
    ///
    /// Sets: `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `reason`
    SubscriberPanicked,
}

impl EventKind {
    /// True for the last event of a run; the subscriber listener drains and stops on it.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, EventKind::BankClosed | EventKind::GraceExceeded)
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Teller involved, if any.
    pub teller: Option<u32>,
    /// Customer involved, if any.
    pub customer: Option<u32>,
    /// Transaction kind, when the event is about one.
    pub transaction: Option<Transaction>,
    /// Human-readable reason (errors, overflow details, summaries).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            teller: None,
            customer: None,
            transaction: None,
            reason: None,
        }
    }

    /// Attaches a teller id.
    #[inline]
    pub fn with_teller(mut self, id: u32) -> Self {
        self.teller = Some(id);
        self
    }

    /// Attaches a customer id.
    #[inline]
    pub fn with_customer(mut self, id: u32) -> Self {
        self.customer = Some(id);
        self
    }

    /// Attaches the agent's own id to the matching field.
    #[inline]
    pub fn with_agent(self, agent: AgentId) -> Self {
        match agent {
            AgentId::Teller(id) => self.with_teller(id),
            AgentId::Customer(id) => self.with_customer(id),
        }
    }

    /// Attaches a transaction kind.
    #[inline]
    pub fn with_transaction(mut self, tx: Transaction) -> Self {
        self.transaction = Some(tx);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns the agent whose own lifecycle this event describes.
    ///
    /// Teller-side events that mention a customer (e.g. `TellerServing`) belong to the
    /// teller; `CustomerLeaving` belongs to the customer even though it names its teller.
    pub fn subject(&self) -> Option<AgentId> {
        use EventKind::*;
        match self.kind {
            TellerReady | TellerServing | TransactionRequested | ManagerRequested
            | ManagerEntered | ManagerDone | SafeRequested | SafeEntered | SafeDone
            | TransactionDone | TellerClosing => self.teller.map(AgentId::Teller),
            CustomerArriving | CustomerEntered | CustomerQueued | CustomerLeaving => {
                self.customer.map(AgentId::Customer)
            }
            AgentCancelled => match (self.teller, self.customer) {
                (Some(t), _) => Some(AgentId::Teller(t)),
                (None, Some(c)) => Some(AgentId::Customer(c)),
                (None, None) => None,
            },
            _ => None,
        }
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates the notice the bank's listener emits after skipping `skipped` bus events.
    #[inline]
    pub fn listener_lagged(skipped: u64) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber=listener reason=lagged skipped={skipped}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::BankOpen);
        let b = Event::new(EventKind::BankOpen);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_subject_of_teller_event_mentioning_customer() {
        let ev = Event::new(EventKind::TellerServing)
            .with_teller(2)
            .with_customer(9);
        assert_eq!(ev.subject(), Some(AgentId::Teller(2)));

        let ev = Event::new(EventKind::CustomerLeaving)
            .with_customer(9)
            .with_teller(2);
        assert_eq!(ev.subject(), Some(AgentId::Customer(9)));
    }

    #[test]
    fn test_cancelled_subject_uses_agent_field() {
        let ev = Event::new(EventKind::AgentCancelled).with_agent(AgentId::Customer(4));
        assert_eq!(ev.subject(), Some(AgentId::Customer(4)));
        assert_eq!(Event::new(EventKind::BankOpen).subject(), None);
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(EventKind::BankClosed.is_terminal());
        assert!(EventKind::GraceExceeded.is_terminal());
        assert!(!EventKind::AllStoppedWithin.is_terminal());
    }
}
