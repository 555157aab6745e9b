//! # bankfloor
//!
//! **Bankfloor** is a bank simulation built on async coordination primitives.
//!
//! Tellers consume customers from a shared line; customers produce work and wait
//! until their teller says the transaction is done. Along the way they compete for
//! three bounded resources: the door (customers inside), the manager (withdrawal
//! approval) and the safe. The run ends when every customer has been served and
//! every teller has noticed there is nothing left to do.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐            ┌──────────────┐
//!     │   Teller 0   │   │   Teller 1   │    ...     │  Customer N  │
//!     └──────┬───────┘   └──────┬───────┘            └──────┬───────┘
//!            ▼                  ▼                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Floor (shared by every agent)                                    │
//! │  - door / manager / safe   ResourceGate (counting semaphores)     │
//! │  - queue                   WorkQueue (FIFO + guarded wait)        │
//! │  - served                  ServedCounter (termination predicate)  │
//! │  - barrier                 StartupBarrier (all tellers ready)     │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        │ Publishes        │ Publishes        │ Publishes     │
//!        │ - TellerReady    │ - CustomerQueued │ - BankOpen    │
//!        │ - SafeEntered    │ - CustomerLeaving│ - BankClosed  │
//!        ▼                  ▼                  ▼               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │     bank listener      │
//!                       └───┬────────────────┬───┘
//!                           ▼                ▼
//!                    AliveTracker     SubscriberSet
//!                  (sequence-based)   (per-sub queues)
//!                                  ┌─────────┼─────────┐
//!                                  ▼         ▼         ▼
//!                              LogWriter  Journal    custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! Customer: arrive ─► barrier.wait ─► door.acquire ─► queue.enqueue(ticket)
//!           ─► signal.wait ─► leave (door released)
//!
//! Teller:   ready ─► barrier.arrive ─► loop {
//!             dequeue_or_wait(served)
//!               ├─ Ticket ─► [manager] ─► safe ─► fire(signal) ─► served.record
//!               └─ Closed ─► close
//!           }
//!
//! Bank:     spawn tellers ─► spawn customers ─► join customers
//!           ─► queue.wake_all ─► join tellers ─► BankClosed
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                         |
//! |-------------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Bank**          | Spawn agents, close the bank, graceful shutdown.            | [`Bank`], [`BankBuilder`], [`Report`]      |
//! | **Agents**        | The consumer and producer roles.                            | [`Agent`], [`Teller`], [`Customer`]        |
//! | **Primitives**    | Gates, queue, completion signals, counter and barrier.      | [`ResourceGate`], [`WorkQueue`], ...       |
//! | **Subscriber API**| Hook into the event log (logging, recording, custom).       | [`Subscribe`], [`Journal`]                 |
//! | **Errors**        | Typed errors for configuration, agents and the runtime.     | [`ConfigError`], [`AgentError`], [`RuntimeError`] |
//! | **Configuration** | Sizes, capacities and simulated delays.                     | [`Config`], [`DelayRange`]                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` printing one sentence per event.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use bankfloor::{Bank, Config};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { customers: 10, ..Config::default() }.without_delays();
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn bankfloor::Subscribe>> = vec![Arc::new(bankfloor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn bankfloor::Subscribe>> = Vec::new();
//!
//!     let report = Bank::builder(cfg).with_subscribers(subs).build()?.run().await?;
//!     assert_eq!(report.served, 10);
//!     Ok(())
//! }
//! ```
mod agents;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod sync;

// ---- Public re-exports ----

pub use agents::{Agent, AgentId, Customer, Teller, Transaction};
pub use core::{Bank, BankBuilder, Config, Floor, Report};
pub use error::{AgentError, ConfigError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use policies::DelayRange;
pub use subscribers::{Journal, Subscribe, SubscriberSet};
pub use sync::{
    CompletionSender, CompletionSignal, Dequeue, GatePass, ResourceGate, ServedCounter,
    StartupBarrier, Ticket, WorkQueue, completion,
};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
